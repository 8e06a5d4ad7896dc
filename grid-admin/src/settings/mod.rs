//! Persisted per-grid preferences.
//!
//! Values are stored as bincode blobs under a `(scope, key)` pair; every grid
//! screen owns one scope.

mod backend;
mod sqlite;

pub use backend::PreferenceBackend;
pub use sqlite::SqlitePreferences;

use std::sync::Arc;

use grid_engine::{SortDirection, SortState};
use log::debug;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Preference storage errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),
    #[error("failed to encode {key}: {source}")]
    Encode { key: String, source: bincode::Error },
    #[error("failed to decode {key}: {source}")]
    Decode { key: String, source: bincode::Error },
}

/// What a grid screen remembers between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPreferences {
    pub page_size: usize,
    pub sort_field: Option<String>,
    pub sort_direction: SortDirection,
}

impl GridPreferences {
    pub fn new(page_size: usize, sort: &SortState) -> Self {
        Self {
            page_size,
            sort_field: sort.field().map(str::to_string),
            sort_direction: sort.direction(),
        }
    }

    pub fn sort(&self) -> SortState {
        match &self.sort_field {
            Some(field) => SortState::new(field.clone(), self.sort_direction),
            None => SortState::unsorted(),
        }
    }
}

const GRID_KEY: &str = "grid";

/// Typed access to preference blobs.
#[derive(Clone)]
pub struct Preferences {
    backend: Arc<dyn PreferenceBackend>,
}

impl Preferences {
    pub fn new(backend: impl PreferenceBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Read a value, `None` when never stored.
    pub async fn get<T: DeserializeOwned>(&self, scope: &str, key: &str) -> Result<Option<T>, SettingsError> {
        let Some(bytes) = self.backend.load(scope, key).await? else {
            return Ok(None);
        };
        bincode::deserialize(&bytes)
            .map(Some)
            .map_err(|source| SettingsError::Decode {
                key: format!("{}.{}", scope, key),
                source,
            })
    }

    pub async fn set<T: Serialize + Sync>(&self, scope: &str, key: &str, value: &T) -> Result<(), SettingsError> {
        let bytes = bincode::serialize(value).map_err(|source| SettingsError::Encode {
            key: format!("{}.{}", scope, key),
            source,
        })?;
        self.backend.store(scope, key, bytes).await
    }

    pub async fn remove(&self, scope: &str, key: &str) -> Result<(), SettingsError> {
        self.backend.forget(scope, key).await
    }

    /// Saved preferences of the grid screen `name`.
    pub async fn grid(&self, name: &str) -> Result<Option<GridPreferences>, SettingsError> {
        self.get(name, GRID_KEY).await
    }

    pub async fn save_grid(&self, name: &str, prefs: &GridPreferences) -> Result<(), SettingsError> {
        debug!("saving preferences for {}: {:?}", name, prefs);
        self.set(name, GRID_KEY, prefs).await
    }

    /// Scopes with anything stored.
    pub async fn scopes(&self) -> Result<Vec<String>, SettingsError> {
        self.backend.scopes().await
    }
}
