//! # REST API Interface Layer
//!
//! HTTP endpoints for the classroom growth tracker. Handlers translate JSON
//! requests into domain calls and domain errors into status codes:
//!
//! - validation failure → 400
//! - caller is not a teacher → 403
//! - unknown student, event or measurement, or class not set up → 404
//! - storage failure → 500
//! - assessment provider failure → 502

pub mod assessment_apis;
pub mod class_apis;
pub mod mappers;
pub mod report_apis;
pub mod role;
pub mod student_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{error, warn};

use crate::backend::domain::models::ValidationError;
use crate::backend::domain::{AssessmentError, ClassroomError};

pub(crate) fn validation_error_response(e: &ValidationError) -> Response {
    let status = if e.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::BAD_REQUEST
    };
    warn!("Rejected request: {}", e);
    (status, e.to_string()).into_response()
}

pub(crate) fn classroom_error_response(e: &ClassroomError) -> Response {
    match e {
        ClassroomError::Validation(inner) => validation_error_response(inner),
        ClassroomError::Storage(inner) => {
            error!("Failed to save classroom data: {:#}", inner);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save changes").into_response()
        }
    }
}

pub(crate) fn assessment_error_response(e: &AssessmentError) -> Response {
    let status = match e {
        AssessmentError::StudentNotFound(_) | AssessmentError::MeasurementNotFound(_) => StatusCode::NOT_FOUND,
        AssessmentError::Storage(_) | AssessmentError::Interrupted(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ if e.is_provider_failure() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error!("Assessment failed: {}", e);
    (status, e.to_string()).into_response()
}

pub(crate) fn not_configured_response() -> Response {
    (StatusCode::NOT_FOUND, ValidationError::ClassNotConfigured.to_string()).into_response()
}
