//! # REST API for the Class Report

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Local;
use log::info;

use super::not_configured_response;
use crate::backend::AppState;

/// Assess every pending latest measurement, then return one row per student
pub async fn get_class_report(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/report");

    if !state.classroom_service.is_configured().await {
        return not_configured_response();
    }

    let today = Local::now().date_naive();
    let report = state.assessment_service.class_report(today).await;
    (StatusCode::OK, Json(report)).into_response()
}
