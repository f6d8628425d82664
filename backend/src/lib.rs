//! Classroom child growth tracker backend.
//!
//! Keeps the class roster and each child's height and weight history, derives
//! age and BMI, and attaches growth assessments from an external provider.

pub mod backend;
pub mod config;
