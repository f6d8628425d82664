//! backend/src/backend/io/rest/mappers/assessment_mapper.rs

use crate::backend::domain::models::{Advice, Assessment as DomainAssessment, LabelError};
use shared::{Assessment as SharedAssessment, ParentalAdvice};

/// Mapper between the wire assessment (free-text labels) and the validated domain assessment.
pub struct AssessmentMapper;

impl AssessmentMapper {
    /// Validates every label; an unknown label rejects the whole assessment.
    pub fn to_domain(dto: SharedAssessment) -> Result<DomainAssessment, LabelError> {
        let advice = dto
            .parental_advice
            .into_iter()
            .map(|a| Advice {
                title: a.title.trim().to_string(),
                details: a.details.trim().to_string(),
            })
            .collect();

        DomainAssessment::from_labels(
            &dto.height_status,
            &dto.weight_status,
            &dto.bmi_status,
            &dto.overall_status,
            dto.summary,
            advice,
        )
    }

    pub fn to_dto(domain: DomainAssessment) -> SharedAssessment {
        SharedAssessment {
            height_status: domain.height_status.label().to_string(),
            weight_status: domain.weight_status.label().to_string(),
            bmi_status: domain.bmi_status.label().to_string(),
            summary: domain.summary,
            parental_advice: domain
                .advice
                .into_iter()
                .map(|a| ParentalAdvice { title: a.title, details: a.details })
                .collect(),
            overall_status: domain.overall_status.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::{GrowthStatus, OverallStatus};

    #[test]
    fn test_vietnamese_provider_labels_become_canonical() {
        let dto = SharedAssessment {
            height_status: "Thấp còi".to_string(),
            weight_status: "Bình thường".to_string(),
            bmi_status: "Không áp dụng".to_string(),
            summary: "Bé hơi thấp so với tuổi.".to_string(),
            parental_advice: vec![ParentalAdvice {
                title: " Bổ sung canxi ".to_string(),
                details: "Uống sữa mỗi ngày.".to_string(),
            }],
            overall_status: "Cần chú ý".to_string(),
        };

        let domain = AssessmentMapper::to_domain(dto).unwrap();
        assert_eq!(domain.height_status, GrowthStatus::Stunted);
        assert_eq!(domain.overall_status, OverallStatus::NeedsAttention);
        assert_eq!(domain.advice[0].title, "Bổ sung canxi");

        let back = AssessmentMapper::to_dto(domain);
        assert_eq!(back.height_status, "Stunted");
        assert_eq!(back.bmi_status, "Not Applicable");
        assert_eq!(back.overall_status, "Needs Attention");
    }

    #[test]
    fn test_unknown_label_rejects_assessment() {
        let dto = SharedAssessment {
            height_status: "Normal".to_string(),
            weight_status: "Normal".to_string(),
            bmi_status: "Normal".to_string(),
            summary: String::new(),
            parental_advice: Vec::new(),
            overall_status: "Mostly fine".to_string(),
        };
        assert_eq!(
            AssessmentMapper::to_domain(dto),
            Err(LabelError::UnrecognizedOverall("Mostly fine".to_string()))
        );
    }
}
