//! backend/src/backend/io/rest/mappers/student_mapper.rs

use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;

use super::assessment_mapper::AssessmentMapper;
use crate::backend::domain::metrics::{format_iso_date, parse_iso_date};
use crate::backend::domain::models::{
    Measurement as DomainMeasurement, PhotoRef, Student as DomainStudent,
};
use shared::{
    Measurement as SharedMeasurement, Student as SharedStudent, StudentListResponse, StudentResponse,
};

/// Mapper to convert between shared Student DTOs and domain Student models.
pub struct StudentMapper;

impl StudentMapper {
    /// Converts a shared Student DTO to a domain Student model.
    pub fn to_domain(dto: SharedStudent) -> Result<DomainStudent> {
        let dob = parse_iso_date(&dto.dob)
            .ok_or_else(|| anyhow!("Invalid date of birth {:?} for student {}", dto.dob, dto.id))?;

        let mut measurements = dto
            .measurements
            .into_iter()
            .map(Self::measurement_to_domain)
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Failed to map measurements for student {}", dto.id))?;
        measurements.sort_by_key(|m| m.date);

        let mut seen = HashSet::new();
        if let Some(duplicate) = measurements.iter().find(|m| !seen.insert(m.id.as_str())) {
            return Err(anyhow!(
                "Duplicate measurement id {} for student {}",
                duplicate.id,
                dto.id
            ));
        }

        Ok(DomainStudent {
            id: dto.id,
            name: dto.name,
            dob,
            gender: dto.gender,
            photo: dto.photo.map(PhotoRef::new),
            parent_phone: dto.parent_phone,
            health_notes: dto.health_notes,
            measurements,
        })
    }

    /// Converts a domain Student model to a shared Student DTO.
    pub fn to_dto(domain: DomainStudent) -> SharedStudent {
        SharedStudent {
            id: domain.id,
            name: domain.name,
            dob: format_iso_date(domain.dob),
            gender: domain.gender,
            photo: domain.photo.map(PhotoRef::into_inner),
            parent_phone: domain.parent_phone,
            health_notes: domain.health_notes,
            measurements: domain
                .measurements
                .into_iter()
                .map(Self::measurement_to_dto)
                .collect(),
        }
    }

    pub fn measurement_to_domain(dto: SharedMeasurement) -> Result<DomainMeasurement> {
        let date = parse_iso_date(&dto.date)
            .ok_or_else(|| anyhow!("Invalid measurement date {:?} for measurement {}", dto.date, dto.id))?;
        let assessment = dto
            .assessment
            .map(AssessmentMapper::to_domain)
            .transpose()
            .with_context(|| format!("Invalid assessment on measurement {}", dto.id))?;

        Ok(DomainMeasurement {
            id: dto.id,
            date,
            height_cm: dto.height,
            weight_kg: dto.weight,
            bmi: dto.bmi,
            assessment,
        })
    }

    pub fn measurement_to_dto(domain: DomainMeasurement) -> SharedMeasurement {
        SharedMeasurement {
            id: domain.id,
            date: format_iso_date(domain.date),
            height: domain.height_cm,
            weight: domain.weight_kg,
            bmi: domain.bmi,
            assessment: domain.assessment.map(AssessmentMapper::to_dto),
        }
    }

    pub fn to_student_list_dto(domain_students: Vec<DomainStudent>) -> StudentListResponse {
        StudentListResponse {
            students: domain_students.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_student_response_dto(domain: DomainStudent, message: &str) -> StudentResponse {
        StudentResponse {
            student: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }
}
