//! Preference storage trait.

use async_trait::async_trait;

use super::SettingsError;

/// Raw blob storage keyed by `(scope, key)`.
///
/// [`Preferences`](super::Preferences) adds typed encoding on top.
#[async_trait]
pub trait PreferenceBackend: Send + Sync {
    async fn load(&self, scope: &str, key: &str) -> Result<Option<Vec<u8>>, SettingsError>;

    /// Insert or replace.
    async fn store(&self, scope: &str, key: &str, value: Vec<u8>) -> Result<(), SettingsError>;

    async fn forget(&self, scope: &str, key: &str) -> Result<(), SettingsError>;

    async fn scopes(&self) -> Result<Vec<String>, SettingsError>;
}
