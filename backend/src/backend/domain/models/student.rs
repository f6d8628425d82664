//! Domain model for a student and their measurement history.
//!
//! The measurement list is always sorted by ascending date. Every insertion
//! re-sorts it with a stable sort, so entries sharing a date keep their
//! insertion order and backfilled measurements land in the right place.

use chrono::NaiveDate;
use log::debug;
use shared::Gender;
use uuid::Uuid;

use super::assessment::Assessment;
use crate::backend::domain::metrics;

/// Opaque photo reference produced by the image encoder. Never interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRef(String);

impl PhotoRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub id: String,
    pub date: NaiveDate,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: Option<f64>,
    pub assessment: Option<Assessment>,
}

impl Measurement {
    pub fn generate_id() -> String {
        format!("measurement::{}", Uuid::new_v4())
    }

    pub fn is_assessed(&self) -> bool {
        self.assessment.is_some()
    }
}

/// Result of trying to attach an assessment to a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    Attached,
    /// The measurement already carried an assessment; the first one is kept
    AlreadyAssessed,
    NotFound,
}

/// Which series a growth chart plots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthMetric {
    Height,
    Weight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub photo: Option<PhotoRef>,
    pub parent_phone: Option<String>,
    pub health_notes: Option<String>,
    pub measurements: Vec<Measurement>,
}

impl Student {
    pub fn generate_id() -> String {
        format!("student::{}", Uuid::new_v4())
    }

    /// Age in whole months on the given date
    pub fn age_in_months_on(&self, date: NaiveDate) -> u32 {
        metrics::age_in_months(self.dob, date)
    }

    /// Age at the latest measurement, or on `today` when nothing was measured yet
    pub fn current_age_in_months(&self, today: NaiveDate) -> u32 {
        match self.latest_measurement() {
            Some(latest) => self.age_in_months_on(latest.date),
            None => self.age_in_months_on(today),
        }
    }

    /// Record a new measurement and keep the history date-ordered.
    ///
    /// Inputs are expected to be validated by the caller; BMI is only derived
    /// when the student is at least [`metrics::BMI_MIN_AGE_MONTHS`] old on `date`.
    pub fn add_measurement(&mut self, height_cm: f64, weight_kg: f64, date: NaiveDate) -> Measurement {
        let bmi = if metrics::bmi_applies(self.age_in_months_on(date)) {
            metrics::bmi(height_cm, weight_kg)
        } else {
            None
        };

        let measurement = Measurement {
            id: Measurement::generate_id(),
            date,
            height_cm,
            weight_kg,
            bmi,
            assessment: None,
        };

        self.measurements.push(measurement.clone());
        self.measurements.sort_by_key(|m| m.date);
        measurement
    }

    /// Chronologically last measurement. On a date tie the later insertion wins.
    pub fn latest_measurement(&self) -> Option<&Measurement> {
        self.measurements.iter().max_by_key(|m| m.date)
    }

    pub fn measurement(&self, measurement_id: &str) -> Option<&Measurement> {
        self.measurements.iter().find(|m| m.id == measurement_id)
    }

    /// Attach an assessment to one measurement. The first attached assessment
    /// wins; unknown ids are ignored.
    pub fn attach_assessment(&mut self, measurement_id: &str, assessment: Assessment) -> AttachOutcome {
        match self.measurements.iter_mut().find(|m| m.id == measurement_id) {
            Some(measurement) if measurement.assessment.is_some() => {
                debug!("Measurement {} already assessed, keeping existing assessment", measurement_id);
                AttachOutcome::AlreadyAssessed
            }
            Some(measurement) => {
                measurement.assessment = Some(assessment);
                AttachOutcome::Attached
            }
            None => {
                debug!("Measurement {} not found on student {}", measurement_id, self.id);
                AttachOutcome::NotFound
            }
        }
    }

    /// Points for a growth chart, or `None` with fewer than two measurements
    pub fn growth_series(&self, metric: GrowthMetric) -> Option<Vec<(NaiveDate, f64)>> {
        if self.measurements.len() < 2 {
            return None;
        }
        Some(
            self.measurements
                .iter()
                .map(|m| {
                    let value = match metric {
                        GrowthMetric::Height => m.height_cm,
                        GrowthMetric::Weight => m.weight_kg,
                    };
                    (m.date, value)
                })
                .collect(),
        )
    }
}
