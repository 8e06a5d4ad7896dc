//! Pagination strategies.
//!
//! A grid paginates either *locally*, slicing the in-memory collection it
//! holds, or *delegated*, where the caller pages the data and the grid only
//! displays what it was given and raises change intents. The strategy is
//! chosen when the grid is built and never changes afterwards.

use std::ops::Range;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::events::GridEvent;

/// Which pagination strategy a grid uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    #[default]
    Local,
    Delegated,
}

/// Page navigation requests independent of the page numbering convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    First,
    Previous,
    Next,
    Last,
}

/// Page count for `total` rows at `per_page` rows each.
///
/// A zero page size is treated as one.
pub fn page_count(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1))
}

// =============================================================================
// Local
// =============================================================================

/// Pages an in-memory collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPager {
    /// 0-based page index.
    page_index: usize,
    page_size: usize,
    /// When false the whole collection is one page.
    paginate: bool,
}

impl LocalPager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
            paginate: true,
        }
    }

    /// Shows the whole collection without paging.
    pub fn unpaginated() -> Self {
        Self {
            page_index: 0,
            page_size: 1,
            paginate: false,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_paginated(&self) -> bool {
        self.paginate
    }

    pub fn page_count(&self, len: usize) -> usize {
        if self.paginate {
            page_count(len, self.page_size)
        } else {
            usize::from(len > 0)
        }
    }

    /// Index range of the current page within a collection of `len` rows.
    pub fn current_range(&self, len: usize) -> Range<usize> {
        if !self.paginate {
            return 0..len;
        }
        let start = self.page_index.saturating_mul(self.page_size).min(len);
        let end = start.saturating_add(self.page_size).min(len);
        start..end
    }

    /// Move to page `index`, clamped into `[0, page_count - 1]`.
    pub fn set_page(&mut self, index: usize, len: usize) -> usize {
        let last = self.page_count(len).saturating_sub(1);
        self.page_index = index.min(last);
        self.page_index
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page_index = 0;
    }

    /// Keep the page index valid after the collection shrank.
    pub fn clamp(&mut self, len: usize) {
        let last = self.page_count(len).saturating_sub(1);
        self.page_index = self.page_index.min(last);
    }
}

// =============================================================================
// Delegated
// =============================================================================

/// Displays pages produced elsewhere.
///
/// Holds only what the caller last reported; page and page-size changes are
/// forwarded as events, never applied locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegatedPager {
    total_rows: Option<usize>,
    /// 1-based.
    current_page: usize,
    rows_per_page: usize,
}

impl DelegatedPager {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            total_rows: None,
            current_page: 1,
            rows_per_page: rows_per_page.max(1),
        }
    }

    /// Record what the caller currently displays.
    ///
    /// With a known, non-zero total the page is clamped into
    /// `[1, page_count]`.
    pub fn set_page_info(&mut self, total_rows: Option<usize>, current_page: usize, rows_per_page: usize) {
        self.total_rows = total_rows;
        self.rows_per_page = rows_per_page.max(1);
        let last = self.page_count();
        self.current_page = if last > 0 {
            current_page.clamp(1, last)
        } else {
            current_page.max(1)
        };
    }

    pub fn set_total_rows(&mut self, total_rows: Option<usize>) {
        self.total_rows = total_rows;
    }

    pub fn total_rows(&self) -> Option<usize> {
        self.total_rows
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// `ceil(total / rows_per_page)`, or 0 while the total is unknown.
    pub fn page_count(&self) -> usize {
        self.total_rows
            .map_or(0, |total| page_count(total, self.rows_per_page))
    }

    /// Validate a request for page `page` (1-based).
    ///
    /// Returns the clamped page to request, or `None` when nothing should
    /// be requested: the total is unknown, the grid is loading, or the
    /// clamped page is already current.
    pub fn request_page(&self, page: usize, loading: bool) -> Option<usize> {
        let count = self.page_count();
        if loading || count == 0 {
            return None;
        }
        let page = page.clamp(1, count);
        (page != self.current_page).then_some(page)
    }
}

// =============================================================================
// Strategy
// =============================================================================

/// Display state of the pagination footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLabel {
    /// A fetch is in flight.
    Loading,
    /// Nothing to page through.
    Empty,
    /// `current / count`, both 1-based.
    Page { current: usize, count: usize },
}

/// Everything the footer needs to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStatus {
    pub label: PageLabel,
    /// `(first, last, total)` row positions shown, 1-based.
    pub range: Option<(usize, usize, usize)>,
    pub can_previous: bool,
    pub can_next: bool,
    pub page_size: usize,
}

/// The pagination strategy of a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pagination {
    Local(LocalPager),
    Delegated(DelegatedPager),
}

impl Pagination {
    pub fn mode(&self) -> PaginationMode {
        match self {
            Self::Local(_) => PaginationMode::Local,
            Self::Delegated(_) => PaginationMode::Delegated,
        }
    }

    /// The rows to display.
    ///
    /// Local mode slices `rows`; delegated mode returns them unchanged.
    pub fn current_rows<'a, R>(&self, rows: &'a [R]) -> &'a [R] {
        match self {
            Self::Local(pager) => &rows[pager.current_range(rows.len())],
            Self::Delegated(_) => rows,
        }
    }

    /// Number of pages. `len` is the local collection length.
    pub fn page_count(&self, len: usize) -> usize {
        match self {
            Self::Local(pager) => pager.page_count(len),
            Self::Delegated(pager) => pager.page_count(),
        }
    }

    /// Handle a page change.
    ///
    /// Local mode takes a 0-based index, clamps it and applies it. Delegated
    /// mode takes a 1-based page number and returns the intent to emit.
    pub fn on_page_change(&mut self, page: usize, len: usize, loading: bool) -> Option<GridEvent> {
        match self {
            Self::Local(pager) => {
                let index = pager.set_page(page, len);
                debug!(target: "grid_engine::pagination", "local page {} -> {}", page, index);
                None
            }
            Self::Delegated(pager) => {
                let requested = pager.request_page(page, loading);
                debug!(target: "grid_engine::pagination", "delegated page {} -> {:?}", page, requested);
                requested.map(GridEvent::PageChanged)
            }
        }
    }

    /// Handle a page size change.
    ///
    /// Local mode applies it and returns to the first page. Delegated mode
    /// returns the intent to emit.
    pub fn on_page_size_change(&mut self, size: usize) -> Option<GridEvent> {
        let size = size.max(1);
        match self {
            Self::Local(pager) => {
                pager.set_page_size(size);
                None
            }
            Self::Delegated(_) => Some(GridEvent::PageSizeChanged(size)),
        }
    }

    /// Resolve a navigation request into this strategy's page numbering.
    pub fn resolve(&self, nav: PageNav, len: usize) -> usize {
        match self {
            Self::Local(pager) => {
                let index = pager.page_index();
                match nav {
                    PageNav::First => 0,
                    PageNav::Previous => index.saturating_sub(1),
                    PageNav::Next => index.saturating_add(1),
                    PageNav::Last => pager.page_count(len).saturating_sub(1),
                }
            }
            Self::Delegated(pager) => {
                let current = pager.current_page();
                match nav {
                    PageNav::First => 1,
                    PageNav::Previous => current.saturating_sub(1).max(1),
                    PageNav::Next => current.saturating_add(1),
                    PageNav::Last => pager.page_count().max(1),
                }
            }
        }
    }

    /// Page size currently in effect.
    pub fn page_size(&self) -> usize {
        match self {
            Self::Local(pager) => pager.page_size(),
            Self::Delegated(pager) => pager.rows_per_page(),
        }
    }

    /// `(total, current_page, rows_per_page)` for the numbering policy.
    ///
    /// An unpaginated local grid reports page 1, so its offset is zero.
    pub fn numbering_basis(&self, len: usize) -> (Option<usize>, usize, usize) {
        match self {
            Self::Local(pager) if pager.is_paginated() => {
                (Some(len), pager.page_index() + 1, pager.page_size())
            }
            Self::Local(_) => (Some(len), 1, len.max(1)),
            Self::Delegated(pager) => (
                pager.total_rows(),
                pager.current_page(),
                pager.rows_per_page(),
            ),
        }
    }

    /// Footer status.
    pub fn status(&self, len: usize, loading: bool) -> PageStatus {
        let page_size = self.page_size();
        if loading {
            return PageStatus {
                label: PageLabel::Loading,
                range: None,
                can_previous: false,
                can_next: false,
                page_size,
            };
        }

        let (total, current, count) = match self {
            Self::Local(pager) => (len, pager.page_index() + 1, pager.page_count(len)),
            Self::Delegated(pager) => (
                pager.total_rows().unwrap_or(0),
                pager.current_page(),
                pager.page_count(),
            ),
        };

        if total == 0 || count == 0 {
            return PageStatus {
                label: PageLabel::Empty,
                range: None,
                can_previous: false,
                can_next: false,
                page_size,
            };
        }

        let per_page = match self {
            Self::Local(pager) if !pager.is_paginated() => total,
            _ => page_size,
        };
        let first = current
            .saturating_sub(1)
            .saturating_mul(per_page)
            .saturating_add(1)
            .min(total);
        let last = current.saturating_mul(per_page).min(total);

        PageStatus {
            label: PageLabel::Page { current, count },
            range: Some((first, last, total)),
            can_previous: current > 1,
            can_next: current < count,
            page_size,
        }
    }
}
