use anyhow::{anyhow, Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Folder name used under the user's documents directory
pub const DEFAULT_DATA_FOLDER: &str = "Growth Tracker";

const CLASS_INFO_FILE: &str = "class_info.yaml";
const STUDENTS_FILE: &str = "students.yaml";

/// YamlConnection owns the data directory and knows where each document lives
#[derive(Debug, Clone)]
pub struct YamlConnection {
    base_directory: PathBuf,
}

impl YamlConnection {
    /// Create a new connection, creating the base directory if it doesn't exist
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Default data directory: ~/Documents/Growth Tracker, falling back to the home directory
    pub fn default_data_directory() -> Result<PathBuf> {
        dirs::document_dir()
            .or_else(dirs::home_dir)
            .map(|dir| dir.join(DEFAULT_DATA_FOLDER))
            .ok_or_else(|| anyhow!("Could not determine home directory"))
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn class_info_path(&self) -> PathBuf {
        self.base_directory.join(CLASS_INFO_FILE)
    }

    pub fn students_path(&self) -> PathBuf {
        self.base_directory.join(STUDENTS_FILE)
    }
}
