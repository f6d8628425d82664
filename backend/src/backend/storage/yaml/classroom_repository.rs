use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Serialize;
use std::fs;
use std::path::Path;

use super::connection::YamlConnection;
use crate::backend::domain::models::{ClassInfo, Student};
use crate::backend::io::rest::mappers::class_info_mapper::ClassInfoMapper;
use crate::backend::io::rest::mappers::student_mapper::StudentMapper;
use crate::backend::storage::{ClassroomStorage, StoredClassroom};

/// YAML-backed classroom repository
#[derive(Debug, Clone)]
pub struct ClassroomRepository {
    connection: YamlConnection,
}

/// Atomic write using a temp file next to the target
fn write_yaml<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let yaml_content = serde_yaml::to_string(value)?;
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, yaml_content)
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

impl ClassroomRepository {
    pub fn new(connection: YamlConnection) -> Self {
        Self { connection }
    }

    fn load_class_info(&self) -> Result<Option<ClassInfo>> {
        let path = self.connection.class_info_path();
        if !path.exists() {
            return Ok(None);
        }

        let yaml_content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let shared_info: shared::ClassInfo = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Malformed class info in {}", path.display()))?;
        let class_info = ClassInfoMapper::to_domain(shared_info)
            .context("Failed to map shared class info to domain class info")?;

        Ok(Some(class_info))
    }

    fn load_students(&self) -> Result<Vec<Student>> {
        let path = self.connection.students_path();
        if !path.exists() {
            debug!("No student file at {}, starting with an empty list", path.display());
            return Ok(Vec::new());
        }

        let yaml_content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let shared_students: Vec<shared::Student> = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Malformed student list in {}", path.display()))?;

        shared_students
            .into_iter()
            .map(StudentMapper::to_domain)
            .collect()
    }
}

#[async_trait]
impl ClassroomStorage for ClassroomRepository {
    async fn load(&self) -> Result<Option<StoredClassroom>> {
        let class_info = match self.load_class_info()? {
            Some(info) => info,
            None => {
                if self.connection.students_path().exists() {
                    warn!("Found a student list without class info; treating the class as not set up");
                }
                return Ok(None);
            }
        };

        let students = self.load_students()?;
        info!(
            "Loaded class {} with {} students",
            class_info.class_name,
            students.len()
        );

        Ok(Some(StoredClassroom { class_info, students }))
    }

    async fn save_class_info(&self, class_info: &ClassInfo) -> Result<()> {
        let dto = ClassInfoMapper::to_dto(class_info.clone());
        write_yaml(&self.connection.class_info_path(), &dto)?;
        debug!("Saved class info for {}", class_info.class_name);
        Ok(())
    }

    async fn save_students(&self, students: &[Student]) -> Result<()> {
        let dtos: Vec<shared::Student> = students
            .iter()
            .cloned()
            .map(StudentMapper::to_dto)
            .collect();
        write_yaml(&self.connection.students_path(), &dtos)?;
        debug!("Saved {} students", dtos.len());
        Ok(())
    }
}
