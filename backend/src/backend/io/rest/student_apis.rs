//! # REST API for Students
//!
//! Enrollment, student details and measurements.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Local;
use log::info;

use super::mappers::student_mapper::StudentMapper;
use super::role::CallerRole;
use super::{classroom_error_response, not_configured_response, validation_error_response};
use crate::backend::domain::classroom::validate_body_measurements;
use crate::backend::domain::metrics::parse_iso_date;
use crate::backend::domain::models::{PhotoRef, ValidationError};
use crate::backend::domain::NewStudent;
use crate::backend::AppState;
use shared::{AddMeasurementRequest, CreateStudentRequest, MeasurementResponse, UpdateStudentInfoRequest};

fn new_student(request: CreateStudentRequest) -> Result<NewStudent, ValidationError> {
    let dob = parse_iso_date(&request.dob).ok_or(ValidationError::InvalidDate(request.dob))?;
    Ok(NewStudent {
        name: request.name,
        dob,
        gender: request.gender,
        photo: request.photo.filter(|p| !p.is_empty()).map(PhotoRef::new),
        parent_phone: request.parent_phone,
        health_notes: request.health_notes,
    })
}

/// List all students in enrollment order
pub async fn list_students(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/students");

    let students = state.classroom_service.list_students().await;
    (StatusCode::OK, Json(StudentMapper::to_student_list_dto(students)))
}

/// Enroll a student
pub async fn create_student(
    State(state): State<AppState>,
    role: CallerRole,
    Json(request): Json<CreateStudentRequest>,
) -> impl IntoResponse {
    info!("POST /api/students - name: {}, dob: {}", request.name, request.dob);
    if let Err(rejection) = role.require_teacher() {
        return rejection;
    }
    if !state.classroom_service.is_configured().await {
        return not_configured_response();
    }

    let new_student = match new_student(request) {
        Ok(new_student) => new_student,
        Err(e) => return validation_error_response(&e),
    };

    match state.classroom_service.add_student(new_student).await {
        Ok(student) => (
            StatusCode::CREATED,
            Json(StudentMapper::to_student_response_dto(student, "Student added")),
        )
            .into_response(),
        Err(e) => classroom_error_response(&e),
    }
}

/// Student detail with age, latest measurement and growth chart series
pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/students/{}", student_id);

    let today = Local::now().date_naive();
    match state.classroom_service.student_detail(&student_id, today).await {
        Some(detail) => (StatusCode::OK, Json(detail)).into_response(),
        None => validation_error_response(&ValidationError::StudentNotFound(student_id)),
    }
}

/// Update the parent contact and health notes
pub async fn update_student_info(
    State(state): State<AppState>,
    role: CallerRole,
    Path(student_id): Path<String>,
    Json(request): Json<UpdateStudentInfoRequest>,
) -> impl IntoResponse {
    info!("PUT /api/students/{}/info - request: {:?}", student_id, request);
    if let Err(rejection) = role.require_teacher() {
        return rejection;
    }

    match state
        .classroom_service
        .update_student_info(&student_id, request.parent_phone, request.health_notes)
        .await
    {
        Ok(student) => (
            StatusCode::OK,
            Json(StudentMapper::to_student_response_dto(student, "Student information updated")),
        )
            .into_response(),
        Err(e) => classroom_error_response(&e),
    }
}

/// Record a height and weight measurement
pub async fn add_measurement(
    State(state): State<AppState>,
    role: CallerRole,
    Path(student_id): Path<String>,
    Json(request): Json<AddMeasurementRequest>,
) -> impl IntoResponse {
    info!("POST /api/students/{}/measurements - request: {:?}", student_id, request);
    if let Err(rejection) = role.require_teacher() {
        return rejection;
    }

    if let Err(e) = validate_body_measurements(request.height, request.weight) {
        return validation_error_response(&e);
    }
    let Some(date) = parse_iso_date(&request.date) else {
        return validation_error_response(&ValidationError::InvalidDate(request.date));
    };

    match state
        .classroom_service
        .add_measurement(&student_id, request.height, request.weight, date)
        .await
    {
        Ok(measurement) => (
            StatusCode::CREATED,
            Json(MeasurementResponse {
                student_id,
                measurement: StudentMapper::measurement_to_dto(measurement),
                success_message: "Measurement saved".to_string(),
            }),
        )
            .into_response(),
        Err(e) => classroom_error_response(&e),
    }
}
