//! # REST API for Growth Assessments

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;

use super::assessment_error_response;
use super::mappers::assessment_mapper::AssessmentMapper;
use crate::backend::AppState;
use shared::AssessmentResponse;

/// Assess a measurement, or return its existing assessment.
///
/// Open to every role: viewing a measurement is what triggers its assessment.
pub async fn request_assessment(
    State(state): State<AppState>,
    Path((student_id, measurement_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!(
        "POST /api/students/{}/measurements/{}/assessment",
        student_id, measurement_id
    );

    match state
        .assessment_service
        .ensure_assessment(&student_id, &measurement_id)
        .await
    {
        Ok(assessment) => (
            StatusCode::OK,
            Json(AssessmentResponse {
                student_id,
                measurement_id,
                assessment: AssessmentMapper::to_dto(assessment),
            }),
        )
            .into_response(),
        Err(e) => assessment_error_response(&e),
    }
}
