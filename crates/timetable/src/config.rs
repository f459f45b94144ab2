//! Application configuration.
//!
//! Loaded from a JSON file whose path comes from `TIMETABLE_CONFIG`
//! (default `timetable.json`). Every field has a default, so a missing file
//! is not an error; a file that exists but does not parse is.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::planner::PlannerConfig;
use crate::timetable::DayTiming;

/// Env var naming the config file.
pub const CONFIG_PATH_VAR: &str = "TIMETABLE_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "timetable.json";

/// Env vars that override `planner.api_key`, in priority order.
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub listen_address: String,
    pub port: u16,
    pub database_path: String,
    /// Logical key the saved timetable list is stored under
    pub store_name: String,
    /// Day window for drafts when a working day has no timing of its own
    pub draft_window: DayTiming,
    /// Open timetables kept in memory before the oldest is closed
    pub max_open_timetables: usize,
    pub planner: PlannerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0".to_string(),
            port: 8080,
            database_path: "timetables.db".to_string(),
            store_name: "saved_timetables".to_string(),
            draft_window: DayTiming::default(),
            max_open_timetables: 64,
            planner: PlannerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the path in `TIMETABLE_CONFIG` and applies
    /// env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_from_path(Path::new(&path))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Loads the config from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Config file {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Applies env overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = API_KEY_VARS
            .iter()
            .filter_map(|var| lookup(var))
            .find(|value| !value.trim().is_empty());

        if let Some(key) = key {
            self.planner.api_key = Some(key);
        }
    }

    /// `listen_address:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen_address, self.port)
    }
}
