pub mod assessment;
pub mod class_info;
pub mod student;

pub use assessment::{Advice, Assessment, GrowthStatus, LabelError, OverallStatus, StatusSeverity};
pub use class_info::{ClassInfo, HealthEvent, MenuSlot, SchoolDay};
pub use student::{AttachOutcome, GrowthMetric, Measurement, PhotoRef, Student};

/// Input validation failures. Rejected before any state changes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name cannot be empty")]
    EmptyName,
    #[error("Name cannot exceed 100 characters")]
    NameTooLong,
    #[error("Height must be a positive number of centimetres, got {0}")]
    NonPositiveHeight(f64),
    #[error("Weight must be a positive number of kilograms, got {0}")]
    NonPositiveWeight(f64),
    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Class name cannot be empty")]
    EmptyClassName,
    #[error("Exactly two teacher names are required")]
    TeacherCount,
    #[error("Teacher {0} name cannot be empty")]
    EmptyTeacherName(usize),
    #[error("Event title cannot be empty")]
    EmptyEventTitle,
    #[error("Event id cannot be empty")]
    EmptyEventId,
    #[error("Duplicate schedule event id: {0}")]
    DuplicateEventId(String),
    #[error("Unknown school day: {0}")]
    UnknownSchoolDay(String),
    #[error("Student not found: {0}")]
    StudentNotFound(String),
    #[error("Schedule event not found: {0}")]
    EventNotFound(String),
    #[error("Class has not been set up yet")]
    ClassNotConfigured,
}

impl ValidationError {
    /// Whether the error refers to something that does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ValidationError::StudentNotFound(_)
                | ValidationError::EventNotFound(_)
                | ValidationError::ClassNotConfigured
        )
    }
}
