/// Test utilities for storage-backed tests
///
/// `TestEnvironment` owns a temporary data directory that is removed when the
/// environment is dropped, even if the test panics.

use std::path::PathBuf;
use tempfile::TempDir;
use anyhow::Result;
use std::sync::Arc;

use super::classroom_repository::ClassroomRepository;
use super::connection::YamlConnection;

pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub connection: YamlConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("growth_tracker_")?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = YamlConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    pub fn repository(&self) -> ClassroomRepository {
        ClassroomRepository::new(self.connection.clone())
    }

    pub fn shared_repository(&self) -> Arc<ClassroomRepository> {
        Arc::new(self.repository())
    }
}
