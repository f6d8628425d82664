//! # Storage Module
//!
//! Handles persistence of the classroom documents.
//!
//! The domain layer only sees the [`ClassroomStorage`] trait; the YAML file
//! implementation lives in [`yaml`] and can be swapped without touching the
//! domain or IO layers.

pub mod traits;
pub mod yaml;

pub use traits::{ClassroomStorage, StoredClassroom};
pub use yaml::{ClassroomRepository, YamlConnection};
