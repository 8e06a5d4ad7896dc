//! Application error type.

use std::path::PathBuf;

use grid_engine::error::GridError;
use thiserror::Error;

use crate::settings::SettingsError;
use crate::store::StoreError;

/// Errors that stop the application from starting or running.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid log level: {0}")]
    LogLevel(String),

    #[error("cannot determine home directory")]
    NoHomeDir,

    #[error("logger already initialized: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}
