//! Contract with the external growth-assessment provider.
//!
//! The provider is a black box: it receives the child's basic figures and
//! answers with a validated [`Assessment`] or an [`AssessmentError`]. Retrying
//! a request is always safe.

use async_trait::async_trait;
use shared::Gender;

use super::metrics;
use super::models::{Assessment, Measurement, Student};

/// Figures sent to the provider for one measurement
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentRequest {
    pub gender: Gender,
    pub age_in_months: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: Option<f64>,
}

impl AssessmentRequest {
    pub fn for_measurement(student: &Student, measurement: &Measurement) -> Self {
        Self {
            gender: student.gender,
            age_in_months: metrics::age_in_months(student.dob, measurement.date),
            height_cm: measurement.height_cm,
            weight_kg: measurement.weight_kg,
            bmi: measurement.bmi,
        }
    }
}

/// Why an assessment could not be produced or attached.
///
/// Cloneable so one outcome can be handed to every caller waiting on the same request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssessmentError {
    #[error("Assessment provider unavailable: {0}")]
    Unavailable(String),
    #[error("Network error talking to assessment provider: {0}")]
    Network(String),
    #[error("Assessment provider timed out")]
    Timeout,
    #[error("Assessment provider returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Malformed assessment response: {0}")]
    Malformed(String),
    #[error("Student not found: {0}")]
    StudentNotFound(String),
    #[error("Measurement not found: {0}")]
    MeasurementNotFound(String),
    #[error("Failed to store assessment: {0}")]
    Storage(String),
    #[error("Assessment request was interrupted: {0}")]
    Interrupted(String),
}

impl AssessmentError {
    /// Errors caused by the provider rather than by the caller or storage
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            AssessmentError::Unavailable(_)
                | AssessmentError::Network(_)
                | AssessmentError::Timeout
                | AssessmentError::Http { .. }
                | AssessmentError::Malformed(_)
        )
    }
}

#[async_trait]
pub trait AssessmentProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    async fn assess(&self, request: &AssessmentRequest) -> Result<Assessment, AssessmentError>;
}
