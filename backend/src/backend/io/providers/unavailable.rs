use async_trait::async_trait;

use crate::backend::domain::assessment_provider::{AssessmentError, AssessmentProvider, AssessmentRequest};
use crate::backend::domain::models::Assessment;

/// Stand-in used when no provider is configured. Every request fails cleanly.
pub struct UnavailableProvider {
    reason: String,
}

impl UnavailableProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl AssessmentProvider for UnavailableProvider {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn assess(&self, _request: &AssessmentRequest) -> Result<Assessment, AssessmentError> {
        Err(AssessmentError::Unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Gender;

    #[tokio::test]
    async fn test_every_request_fails() {
        let provider = UnavailableProvider::new("no API key configured");
        let request = AssessmentRequest {
            gender: Gender::Male,
            age_in_months: 40,
            height_cm: 99.0,
            weight_kg: 15.0,
            bmi: None,
        };

        let result = provider.assess(&request).await;
        assert_eq!(result, Err(AssessmentError::Unavailable("no API key configured".to_string())));
        assert!(result.unwrap_err().is_provider_failure());
    }
}
