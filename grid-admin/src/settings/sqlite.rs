//! SQLite preference storage with an in-memory cache.

use std::path::Path;

use async_sqlite::Client;
use async_trait::async_trait;
use dashmap::DashMap;

use super::{PreferenceBackend, SettingsError};

type CacheKey = (String, String);

/// SQLite-backed preferences, cached in a DashMap after first read.
pub struct SqlitePreferences {
    client: Client,
    cache: DashMap<CacheKey, Vec<u8>>,
}

impl SqlitePreferences {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let client = async_sqlite::ClientBuilder::new().path(path).open().await?;

        client
            .conn(|conn| {
                conn.execute(
                    "CREATE TABLE IF NOT EXISTS preferences (
                        scope TEXT NOT NULL,
                        key TEXT NOT NULL,
                        value BLOB NOT NULL,
                        updated_at TEXT NOT NULL,
                        PRIMARY KEY (scope, key)
                    )",
                    [],
                )
            })
            .await?;

        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }

    fn cache_key(scope: &str, key: &str) -> CacheKey {
        (scope.to_string(), key.to_string())
    }
}

#[async_trait]
impl PreferenceBackend for SqlitePreferences {
    async fn load(&self, scope: &str, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        let cache_key = Self::cache_key(scope, key);
        if let Some(value) = self.cache.get(&cache_key) {
            return Ok(Some(value.clone()));
        }

        let (scope_owned, key_owned) = cache_key.clone();
        let value = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM preferences WHERE scope = ? AND key = ?")?;
                let mut rows = stmt.query([&scope_owned, &key_owned])?;
                match rows.next()? {
                    Some(row) => Ok(Some(row.get::<_, Vec<u8>>(0)?)),
                    None => Ok(None),
                }
            })
            .await?;

        if let Some(value) = &value {
            self.cache.insert(cache_key, value.clone());
        }
        Ok(value)
    }

    async fn store(&self, scope: &str, key: &str, value: Vec<u8>) -> Result<(), SettingsError> {
        let (scope_owned, key_owned) = Self::cache_key(scope, key);
        let blob = value.clone();
        let now = chrono::Utc::now().to_rfc3339();

        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO preferences (scope, key, value, updated_at) VALUES (?, ?, ?, ?)
                     ON CONFLICT(scope, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                    rusqlite::params![&scope_owned, &key_owned, &blob, &now],
                )
            })
            .await?;

        self.cache.insert(Self::cache_key(scope, key), value);
        Ok(())
    }

    async fn forget(&self, scope: &str, key: &str) -> Result<(), SettingsError> {
        let (scope_owned, key_owned) = Self::cache_key(scope, key);
        self.client
            .conn(move |conn| {
                conn.execute(
                    "DELETE FROM preferences WHERE scope = ? AND key = ?",
                    [&scope_owned, &key_owned],
                )
            })
            .await?;

        self.cache.remove(&Self::cache_key(scope, key));
        Ok(())
    }

    async fn scopes(&self) -> Result<Vec<String>, SettingsError> {
        self.client
            .conn(|conn| {
                let mut stmt = conn.prepare("SELECT DISTINCT scope FROM preferences ORDER BY scope")?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect::<Result<Vec<_>, _>>()
            })
            .await
            .map_err(SettingsError::from)
    }
}
