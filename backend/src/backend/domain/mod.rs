//! # Domain Module
//!
//! Business rules for the classroom growth tracker, independent of HTTP and
//! of the storage format.
//!
//! ## Module Organization
//!
//! - **models**: students, measurements, assessments and class metadata
//! - **metrics**: age in months, BMI and date formatting
//! - **classroom**: the aggregate owning class info and the student list
//! - **classroom_service**: persistence-backed access to the aggregate
//! - **assessment_provider**: contract with the external assessment service
//! - **assessment_service**: the unassessed → assessed workflow with request sharing
//! - **class_report**: printable per-student summary rows

pub mod assessment_provider;
pub mod assessment_service;
pub mod class_report;
pub mod classroom;
pub mod classroom_service;
pub mod metrics;
pub mod models;

pub use assessment_provider::{AssessmentError, AssessmentProvider, AssessmentRequest};
pub use assessment_service::{AssessmentService, StudentAssessmentOutcome};
pub use class_report::build_class_report;
pub use classroom::{Classroom, EventDetails, NewStudent};
pub use classroom_service::{ClassroomError, ClassroomService};
