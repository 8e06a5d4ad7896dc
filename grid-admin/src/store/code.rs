//! Common code details: loaded whole, reordered by dragging.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use grid_engine::error::{SourceError, UpdateError};
use grid_engine::source::{ItemUpdater, RowPage, RowQuery, RowSource};
use grid_engine::{GridRow, RankedRow};
use log::debug;

use super::{Store, StoreError};

/// One code of a code group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeDetail {
    pub code_id: String,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub in_use: bool,
    pub order: u32,
}

impl GridRow for CodeDetail {
    fn id(&self) -> String {
        self.code.clone()
    }
}

impl RankedRow for CodeDetail {
    fn rank(&self) -> u32 {
        self.order
    }

    fn set_rank(&mut self, rank: u32) {
        self.order = rank;
    }
}

/// Serves the details of one code group in display order.
#[derive(Clone)]
pub struct CodeSource {
    store: Store,
    code_id: String,
}

impl CodeSource {
    pub fn new(store: Store, code_id: impl Into<String>) -> Self {
        Self {
            store,
            code_id: code_id.into(),
        }
    }
}

#[async_trait]
impl RowSource<CodeDetail> for CodeSource {
    async fn fetch(&self, query: &RowQuery) -> Result<RowPage<CodeDetail>, SourceError> {
        let code_id = self.code_id.clone();
        let pattern = format!("%{}%", query.filter.as_deref().unwrap_or(""));

        let rows = self
            .store
            .client()
            .conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT code_id, code, code_nm, code_dc, use_at, code_order FROM code_detail
                     WHERE code_id = ?1 AND code_nm LIKE ?2
                     ORDER BY code_order, code",
                )?;
                let rows = stmt.query_map([&code_id, &pattern], |row| {
                    Ok(CodeDetail {
                        code_id: row.get(0)?,
                        code: row.get(1)?,
                        name: row.get(2)?,
                        description: row.get(3)?,
                        in_use: row.get::<_, String>(4)? == "Y",
                        order: row.get(5)?,
                    })
                })?;
                rows.collect::<Result<Vec<_>, _>>()
            })
            .await
            .map_err(StoreError::from)?;

        let total = rows.len();
        Ok(RowPage::new(rows).with_total_count(total))
    }
}

/// Writes a code's display order.
pub struct CodeUpdater {
    store: Store,
    /// Reject every nth call.
    fail_every: Option<usize>,
    calls: AtomicUsize,
}

impl CodeUpdater {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            fail_every: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Reject every `n`th update.
    pub fn with_failures(mut self, every: Option<usize>) -> Self {
        self.fail_every = every.filter(|n| *n > 0);
        self
    }
}

#[async_trait]
impl ItemUpdater<CodeDetail> for CodeUpdater {
    async fn update_rank(&self, row: &CodeDetail, rank: u32) -> Result<(), UpdateError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_every.is_some_and(|n| call % n == 0) {
            return Err(UpdateError::rejected(&row.code, "simulated failure"));
        }

        let code_id = row.code_id.clone();
        let code = row.code.clone();
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        debug!("code {}/{} -> order {}", code_id, code, rank);

        let changed = self
            .store
            .client()
            .conn(move |conn| {
                conn.execute(
                    "UPDATE code_detail SET code_order = ?1, last_updt_pnttm = ?2 WHERE code_id = ?3 AND code = ?4",
                    rusqlite::params![rank, now, code_id, code],
                )
            })
            .await
            .map_err(StoreError::from)?;

        if changed == 0 {
            return Err(UpdateError::rejected(&row.code, "no such code"));
        }
        Ok(())
    }
}
