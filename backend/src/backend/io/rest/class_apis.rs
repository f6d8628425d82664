//! # REST API for Class Management
//!
//! Class setup, metadata, the health schedule, the weekly menu and the dashboard.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Local;
use log::info;

use super::mappers::class_info_mapper::ClassInfoMapper;
use super::role::CallerRole;
use super::{classroom_error_response, not_configured_response, validation_error_response};
use crate::backend::domain::metrics::parse_iso_date;
use crate::backend::domain::models::{SchoolDay, ValidationError};
use crate::backend::domain::EventDetails;
use crate::backend::AppState;
use shared::{ClassInfo, ScheduleEventRequest, SetupClassRequest, UpdateMenuRequest};

fn event_details(request: ScheduleEventRequest) -> Result<EventDetails, ValidationError> {
    let date = parse_iso_date(&request.date).ok_or(ValidationError::InvalidDate(request.date))?;
    Ok(EventDetails {
        date,
        title: request.title,
        description: request.description,
    })
}

/// Get the class metadata
pub async fn get_class_info(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/class");

    match state.classroom_service.class_info().await {
        Some(class_info) => (StatusCode::OK, Json(ClassInfoMapper::to_dto(class_info))).into_response(),
        None => not_configured_response(),
    }
}

/// Create the class. Replaces any previous class and its students.
pub async fn setup_class(
    State(state): State<AppState>,
    role: CallerRole,
    Json(request): Json<SetupClassRequest>,
) -> impl IntoResponse {
    info!("POST /api/class/setup - request: {:?}", request);
    if let Err(rejection) = role.require_teacher() {
        return rejection;
    }

    match state
        .classroom_service
        .setup_class(&request.class_name, request.teacher_names)
        .await
    {
        Ok(class_info) => (
            StatusCode::CREATED,
            Json(ClassInfoMapper::to_class_info_response_dto(class_info, "Class created")),
        )
            .into_response(),
        Err(e) => classroom_error_response(&e),
    }
}

/// Replace the class metadata wholesale
pub async fn update_class_info(
    State(state): State<AppState>,
    role: CallerRole,
    Json(request): Json<ClassInfo>,
) -> impl IntoResponse {
    info!("PUT /api/class - class: {}", request.class_name);
    if let Err(rejection) = role.require_teacher() {
        return rejection;
    }
    if !state.classroom_service.is_configured().await {
        return not_configured_response();
    }

    let class_info = match ClassInfoMapper::to_domain(request) {
        Ok(class_info) => class_info,
        Err(e) => return validation_error_response(&e),
    };

    match state.classroom_service.update_class_info(class_info).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ClassInfoMapper::to_class_info_response_dto(updated, "Class information updated")),
        )
            .into_response(),
        Err(e) => classroom_error_response(&e),
    }
}

/// Add a health schedule event
pub async fn add_schedule_event(
    State(state): State<AppState>,
    role: CallerRole,
    Json(request): Json<ScheduleEventRequest>,
) -> impl IntoResponse {
    info!("POST /api/class/schedule - request: {:?}", request);
    if let Err(rejection) = role.require_teacher() {
        return rejection;
    }

    let details = match event_details(request) {
        Ok(details) => details,
        Err(e) => return validation_error_response(&e),
    };

    match state.classroom_service.add_schedule_event(details).await {
        Ok(event) => (StatusCode::CREATED, Json(ClassInfoMapper::event_to_dto(event))).into_response(),
        Err(e) => classroom_error_response(&e),
    }
}

/// Edit a health schedule event
pub async fn update_schedule_event(
    State(state): State<AppState>,
    role: CallerRole,
    Path(event_id): Path<String>,
    Json(request): Json<ScheduleEventRequest>,
) -> impl IntoResponse {
    info!("PUT /api/class/schedule/{} - request: {:?}", event_id, request);
    if let Err(rejection) = role.require_teacher() {
        return rejection;
    }

    let details = match event_details(request) {
        Ok(details) => details,
        Err(e) => return validation_error_response(&e),
    };

    match state.classroom_service.update_schedule_event(&event_id, details).await {
        Ok(event) => (StatusCode::OK, Json(ClassInfoMapper::event_to_dto(event))).into_response(),
        Err(e) => classroom_error_response(&e),
    }
}

/// Remove a health schedule event
pub async fn delete_schedule_event(
    State(state): State<AppState>,
    role: CallerRole,
    Path(event_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/class/schedule/{}", event_id);
    if let Err(rejection) = role.require_teacher() {
        return rejection;
    }

    match state.classroom_service.remove_schedule_event(&event_id).await {
        Ok(_) => (StatusCode::NO_CONTENT, "").into_response(),
        Err(e) => classroom_error_response(&e),
    }
}

/// Set the meals for one school day
pub async fn update_menu(
    State(state): State<AppState>,
    role: CallerRole,
    Path(day): Path<String>,
    Json(request): Json<UpdateMenuRequest>,
) -> impl IntoResponse {
    info!("PUT /api/class/menu/{}", day);
    if let Err(rejection) = role.require_teacher() {
        return rejection;
    }

    let Some(day) = SchoolDay::from_id(&day) else {
        return validation_error_response(&ValidationError::UnknownSchoolDay(day));
    };

    match state.classroom_service.set_menu_meals(day, &request.meals).await {
        Ok(class_info) => (
            StatusCode::OK,
            Json(ClassInfoMapper::to_class_info_response_dto(class_info, "Menu updated")),
        )
            .into_response(),
        Err(e) => classroom_error_response(&e),
    }
}

/// Class overview: teachers, head count, upcoming event, schedule and menu
pub async fn get_dashboard(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/dashboard");

    let today = Local::now().date_naive();
    match state.classroom_service.dashboard(today).await {
        Some(dashboard) => (StatusCode::OK, Json(dashboard)).into_response(),
        None => not_configured_response(),
    }
}
