//! Application configuration.
//!
//! Read from `config.json` in the platform config directory. Every field is
//! optional; a missing file means defaults throughout.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use grid_engine::GridConfig;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Top-level configuration.
///
/// # Example
///
/// ```json
/// {
///   "log_level": "info",
///   "announcements": { "page_size": 20 },
///   "fail_every": 3
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    ///
    /// Default: debug
    pub log_level: String,

    /// Sample database location. Defaults to the platform data directory.
    pub database: Option<PathBuf>,

    /// Announcement list: delegated paging.
    pub announcements: GridConfig,

    /// Code detail list: local, unpaginated, draggable.
    pub codes: GridConfig,

    /// Make every nth order update fail, to see rollback in action.
    pub fail_every: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "debug".to_string(),
            database: None,
            announcements: GridConfig::default(),
            codes: GridConfig::default().with_pagination(false).with_drag(true),
            fail_every: None,
        }
    }
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.announcements.validate()?;
        config.codes.validate()?;
        Ok(config)
    }

    pub fn level(&self) -> Result<LevelFilter, AppError> {
        LevelFilter::from_str(&self.log_level).map_err(|_| AppError::LogLevel(self.log_level.clone()))
    }

    /// Sample database path: the configured one or the platform default.
    pub fn database_path(&self) -> Result<PathBuf, AppError> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => crate::paths::store_db().ok_or(AppError::NoHomeDir),
        }
    }
}
