//! Data service collaborators.
//!
//! The grid does not fetch or persist anything on its own. A [`RowSource`]
//! supplies rows for a [`RowQuery`], and an [`ItemUpdater`] writes a single
//! row's new rank during drag reordering.

use async_trait::async_trait;

use crate::error::{SourceError, UpdateError};
use crate::sort::SortDirection;

/// Parameters for fetching rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowQuery {
    /// 1-based page number.
    pub page: usize,
    /// Rows per page, or `None` for the whole collection.
    pub page_size: Option<usize>,
    pub sort_field: Option<String>,
    pub sort_direction: SortDirection,
    /// Free-text filter.
    pub filter: Option<String>,
}

impl RowQuery {
    /// Offset of the first row of the requested page.
    pub fn offset(&self) -> usize {
        self.page_size
            .map_or(0, |size| self.page.saturating_sub(1) * size)
    }
}

/// A batch of rows with the total record count.
///
/// # Example
///
/// ```
/// use grid_engine::source::RowPage;
///
/// let page = RowPage::new(vec!["a", "b"]).with_total_count(47);
/// assert_eq!(page.len(), 2);
/// assert_eq!(page.total_count(), Some(47));
/// ```
#[derive(Debug, Clone)]
pub struct RowPage<R> {
    rows: Vec<R>,
    total_count: Option<usize>,
}

impl<R> RowPage<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows,
            total_count: None,
        }
    }

    /// Sets the total record count across all pages.
    pub fn with_total_count(mut self, count: usize) -> Self {
        self.total_count = Some(count);
        self
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    /// Total record count, if the source reported one.
    pub fn total_count(&self) -> Option<usize> {
        self.total_count
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<R>, Option<usize>) {
        (self.rows, self.total_count)
    }
}

/// Supplies rows for a query.
#[async_trait]
pub trait RowSource<R>: Send + Sync {
    async fn fetch(&self, query: &RowQuery) -> Result<RowPage<R>, SourceError>;
}

/// Persists a row's new rank.
///
/// Called once per changed row, sequentially. Implementations must be
/// idempotent: writing the same rank twice has the same effect as once.
#[async_trait]
pub trait ItemUpdater<R: Sync>: Send + Sync {
    async fn update_rank(&self, row: &R, rank: u32) -> Result<(), UpdateError>;
}
