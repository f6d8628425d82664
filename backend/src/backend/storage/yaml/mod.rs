//! YAML file storage: `class_info.yaml` and `students.yaml` in the data directory.

pub mod classroom_repository;
pub mod connection;

#[cfg(test)]
pub mod test_utils;

pub use classroom_repository::ClassroomRepository;
pub use connection::YamlConnection;
