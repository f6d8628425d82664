//! # Storage Traits
//!
//! This module defines the storage abstraction that lets the classroom service
//! persist its state without knowing which backend is behind it.

use anyhow::Result;
use async_trait::async_trait;

use crate::backend::domain::models::{ClassInfo, Student};

/// Everything that was persisted for the class
#[derive(Debug, Clone, PartialEq)]
pub struct StoredClassroom {
    pub class_info: ClassInfo,
    pub students: Vec<Student>,
}

/// Trait defining the interface for classroom persistence
///
/// The classroom is stored as two documents, class info and the student list.
/// Both are loaded once at startup and saved after every mutation.
#[async_trait]
pub trait ClassroomStorage: Send + Sync {
    /// Load the stored classroom. `None` means the class has not been set up yet.
    async fn load(&self) -> Result<Option<StoredClassroom>>;

    /// Persist the class info document
    async fn save_class_info(&self, class_info: &ClassInfo) -> Result<()>;

    /// Persist the full student list
    async fn save_students(&self, students: &[Student]) -> Result<()>;
}
