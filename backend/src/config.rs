//! Runtime configuration read from environment variables.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::backend::io::providers::gemini::DEFAULT_MODEL;
use crate::backend::storage::YamlConnection;

pub const DATA_DIR_VAR: &str = "GROWTH_TRACKER_DATA_DIR";
pub const BIND_VAR: &str = "GROWTH_TRACKER_BIND";
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const LEGACY_API_KEY_VAR: &str = "API_KEY";
pub const MODEL_VAR: &str = "GEMINI_MODEL";
pub const TIMEOUT_VAR: &str = "GEMINI_TIMEOUT_SECS";
pub const CORS_ORIGIN_VAR: &str = "GROWTH_TRACKER_CORS_ORIGIN";

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub api_key: Option<String>,
    pub model: String,
    pub request_timeout: Duration,
    pub cors_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let data_dir = match get(DATA_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => YamlConnection::default_data_directory()?,
        };

        let bind = get(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid {}: {}", BIND_VAR, bind))?;

        let request_timeout = match get(TIMEOUT_VAR) {
            Some(secs) => Duration::from_secs(
                secs.parse::<u64>()
                    .with_context(|| format!("Invalid {}: {}", TIMEOUT_VAR, secs))?,
            ),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            data_dir,
            bind_addr,
            api_key: get(API_KEY_VAR).or_else(|| get(LEGACY_API_KEY_VAR)),
            model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            request_timeout,
            cors_origin: get(CORS_ORIGIN_VAR).unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        })
    }
}
