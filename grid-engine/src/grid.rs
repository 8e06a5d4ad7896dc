//! Grid state.

use std::cmp::Ordering as CmpOrdering;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::column::Column;
use crate::config::GridConfig;
use crate::error::GridError;
use crate::events::{DiscardEvents, EventSink, GridEvent};
use crate::numbering::{NumberingInput, RowNumber, row_number};
use crate::pagination::{
    DelegatedPager, LocalPager, PageNav, PageStatus, Pagination, PaginationMode,
};
use crate::row::GridRow;
use crate::sort::{SortChange, SortController, SortDirection, SortInput, SortState};
use crate::source::{RowPage, RowQuery};

/// Unique identifier for a Grid instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridId(usize);

impl GridId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for GridId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__grid_{}", self.0)
    }
}

/// Internal state for a Grid.
pub(crate) struct GridInner<R> {
    /// Column definitions.
    pub columns: Vec<Column<R>>,
    /// Full collection in local mode, current page in delegated mode.
    pub rows: Vec<R>,
    pub sort: SortController,
    pub pagination: Pagination,
    pub config: GridConfig,
    /// A fetch is in flight; totals may be stale.
    pub loading: bool,
    pub filter: Option<String>,
    /// Row picked up for dragging.
    pub dragging: Option<String>,
    /// Token of the reorder session in flight.
    pub reorder: Option<CancellationToken>,
}

impl<R> GridInner<R> {
    /// Re-sort the held rows. See [`GridInner::sort_slice`].
    pub fn sort_rows(&mut self) {
        let mut rows = std::mem::take(&mut self.rows);
        self.sort_slice(&mut rows);
        self.rows = rows;
    }

    /// Order `rows` by the active column when the grid owns sorting.
    ///
    /// Only local grids whose active column has a comparator sort here;
    /// otherwise the rows stay in the order they were given.
    pub fn sort_slice(&self, rows: &mut [R]) {
        if self.pagination.mode() != PaginationMode::Local {
            return;
        }
        let Some(field) = self.sort.state().field() else {
            return;
        };
        let Some(column) = self
            .columns
            .iter()
            .find(|column| column.id() == field && column.has_comparator())
        else {
            return;
        };
        let descending = !self.sort.state().direction().is_ascending();
        rows.sort_by(|a, b| {
            let ordering = column.compare(a, b).unwrap_or(CmpOrdering::Equal);
            if descending { ordering.reverse() } else { ordering }
        });
    }

    /// Drag reordering needs drag enabled and the whole collection held,
    /// which only local grids have.
    pub fn can_reorder(&self) -> bool {
        self.config.enable_drag && self.pagination.mode() == PaginationMode::Local
    }

    fn is_sortable(&self, column_id: &str) -> bool {
        self.columns
            .iter()
            .any(|column| column.id() == column_id && column.is_sortable())
    }

    /// Events to follow a change that invalidates the current page.
    fn back_to_first_page(&mut self) -> Option<GridEvent> {
        let len = self.rows.len();
        match &mut self.pagination {
            Pagination::Local(pager) => {
                pager.set_page(0, len);
                None
            }
            Pagination::Delegated(pager) if pager.current_page() > 1 => Some(GridEvent::PageChanged(1)),
            Pagination::Delegated(_) => None,
        }
    }
}

/// Builder for [`Grid`].
pub struct GridBuilder<R> {
    columns: Vec<Column<R>>,
    mode: PaginationMode,
    config: GridConfig,
    initial_sort: SortState,
    events: Arc<dyn EventSink>,
}

impl<R: GridRow> GridBuilder<R> {
    /// Paginate (and optionally sort) the held collection locally.
    pub fn local(mut self) -> Self {
        self.mode = PaginationMode::Local;
        self
    }

    /// Display pages supplied by the caller.
    pub fn delegated(mut self) -> Self {
        self.mode = PaginationMode::Delegated;
        self
    }

    pub fn mode(mut self, mode: PaginationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    /// Sort state at mount.
    pub fn initial_sort(mut self, sort: SortState) -> Self {
        self.initial_sort = sort;
        self
    }

    /// Where sort, page and filter events go.
    pub fn on_event(mut self, sink: impl EventSink + 'static) -> Self {
        self.events = Arc::new(sink);
        self
    }

    pub fn build(self) -> Result<Grid<R>, GridError> {
        self.config.validate()?;

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.id()) {
                return Err(GridError::DuplicateColumn(column.id().to_string()));
            }
        }

        if let Some(field) = self.initial_sort.field()
            && !self.columns.iter().any(|column| column.id().eq_ignore_ascii_case(field))
        {
            debug!(
                target: "grid_engine::grid",
                "initial sort field {} has no column; sorting stays with the data source",
                field
            );
        }

        let pagination = match self.mode {
            PaginationMode::Local if self.config.paginate => {
                Pagination::Local(LocalPager::new(self.config.page_size))
            }
            PaginationMode::Local => Pagination::Local(LocalPager::unpaginated()),
            PaginationMode::Delegated => {
                Pagination::Delegated(DelegatedPager::new(self.config.page_size))
            }
        };

        let inner = GridInner {
            columns: self.columns,
            rows: Vec::new(),
            sort: SortController::new(self.initial_sort),
            pagination,
            config: self.config,
            loading: false,
            filter: None,
            dragging: None,
            reorder: None,
        };

        let grid = Grid {
            id: GridId::new(),
            inner: Arc::new(RwLock::new(inner)),
            events: self.events,
            dirty: Arc::new(AtomicBool::new(true)),
            shutdown: CancellationToken::new(),
        };
        debug!(target: "grid_engine::grid", "built {} ({:?})", grid.id, self.mode);
        Ok(grid)
    }
}

/// A data grid: columns, rows, sort, pagination and reorder state.
///
/// `Grid` is a cheap handle; clones share the same state, so a clone can be
/// moved into a spawned reorder task while the original keeps rendering.
///
/// # Example
///
/// ```
/// use grid_engine::{Column, Grid, GridRow, SortDirection};
///
/// #[derive(Debug, Clone)]
/// struct Item {
///     id: u32,
///     name: &'static str,
/// }
///
/// impl GridRow for Item {
///     fn id(&self) -> String {
///         self.id.to_string()
///     }
/// }
///
/// let grid = Grid::builder(vec![
///     Column::new("name", "Name", 20, |item: &Item, _| item.name.into())
///         .sort_by(|a: &Item, b: &Item| a.name.cmp(b.name)),
/// ])
/// .local()
/// .build()
/// .unwrap();
///
/// grid.set_rows(vec![Item { id: 1, name: "beta" }, Item { id: 2, name: "alpha" }]);
/// let change = grid.toggle_sort("name").unwrap();
/// assert_eq!(change.direction, SortDirection::Asc);
/// assert_eq!(grid.visible_rows()[0].name, "alpha");
/// ```
pub struct Grid<R: GridRow> {
    id: GridId,
    pub(crate) inner: Arc<RwLock<GridInner<R>>>,
    events: Arc<dyn EventSink>,
    /// Set whenever state changes; cleared by the renderer.
    dirty: Arc<AtomicBool>,
    /// Cancelled on teardown; reorder sessions hold child tokens.
    pub(crate) shutdown: CancellationToken,
}

impl<R: GridRow> Grid<R> {
    /// Start building a grid with the given columns.
    pub fn builder(columns: Vec<Column<R>>) -> GridBuilder<R> {
        GridBuilder {
            columns,
            mode: PaginationMode::Local,
            config: GridConfig::default(),
            initial_sort: SortState::unsorted(),
            events: Arc::new(DiscardEvents),
        }
    }

    pub fn id(&self) -> GridId {
        self.id
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, GridInner<R>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, GridInner<R>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver events. Never called with the state lock held.
    pub(crate) fn emit_all(&self, events: impl IntoIterator<Item = GridEvent>) {
        for event in events {
            debug!(target: "grid_engine::events", "{} emits {:?}", self.id, event);
            self.events.emit(event);
        }
    }

    pub(crate) fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Columns and configuration
    // -------------------------------------------------------------------------

    pub fn columns(&self) -> Vec<Column<R>> {
        self.read().columns.clone()
    }

    pub fn column_count(&self) -> usize {
        self.read().columns.len()
    }

    pub fn config(&self) -> GridConfig {
        self.read().config.clone()
    }

    pub fn mode(&self) -> PaginationMode {
        self.read().pagination.mode()
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Number of rows held.
    pub fn len(&self) -> usize {
        self.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().rows.is_empty()
    }

    /// All rows held, in display order.
    pub fn rows(&self) -> Vec<R> {
        self.read().rows.clone()
    }

    /// Find a row by id, returning its index in the held collection.
    pub fn find_row(&self, id: &str) -> Option<(usize, R)> {
        self.read()
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.id() == id)
            .map(|(index, row)| (index, row.clone()))
    }

    /// The rows on the current page.
    pub fn visible_rows(&self) -> Vec<R> {
        let guard = self.read();
        guard.pagination.current_rows(&guard.rows).to_vec()
    }

    /// Replace the held rows.
    ///
    /// Local grids re-apply their own sort and keep the page index valid.
    pub fn set_rows(&self, rows: Vec<R>) {
        {
            let mut guard = self.write();
            guard.rows = rows;
            guard.sort_rows();
            let len = guard.rows.len();
            if let Pagination::Local(pager) = &mut guard.pagination {
                pager.clamp(len);
            }
            if let Some(id) = guard.dragging.clone()
                && !guard.rows.iter().any(|row| row.id() == id)
            {
                guard.dragging = None;
            }
        }
        self.mark_dirty();
    }

    /// Install a fetched page and clear the loading flag.
    ///
    /// In delegated mode the page's total count becomes the grid's total.
    pub fn load_page(&self, page: RowPage<R>) {
        let (rows, total) = page.into_parts();
        if let Pagination::Delegated(pager) = &mut self.write().pagination {
            pager.set_total_rows(total);
        }
        self.set_rows(rows);
        self.set_loading(false);
    }

    pub fn set_loading(&self, loading: bool) {
        self.write().loading = loading;
        self.mark_dirty();
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    pub fn sort_state(&self) -> SortState {
        self.read().sort.state().clone()
    }

    /// Toggle sort for a column, as when its header is activated.
    ///
    /// Returns `None` (and emits nothing) for unknown or unsortable columns.
    /// Otherwise the new state is applied immediately, local grids re-sort
    /// their rows and return to the first page, and a
    /// [`GridEvent::SortChanged`] is emitted. A delegated grid away from the
    /// first page also asks for page 1.
    pub fn toggle_sort(&self, column_id: &str) -> Option<SortChange> {
        let (change, events) = {
            let mut guard = self.write();
            if !guard.is_sortable(column_id) {
                debug!(target: "grid_engine::sort", "{} ignores toggle on {}", self.id, column_id);
                return None;
            }
            let change = guard.sort.apply(SortInput::Toggle(column_id.to_string()))?;
            guard.sort_rows();
            let mut events = vec![GridEvent::SortChanged {
                field: change.field.clone(),
                direction: change.direction,
            }];
            events.extend(guard.back_to_first_page());
            (change, events)
        };
        self.mark_dirty();
        self.emit_all(events);
        Some(change)
    }

    /// Mirror a sort state pushed by the caller (mount, filter reset).
    ///
    /// Emits nothing. A `None` field leaves the state unchanged.
    pub fn sync_sort(&self, field: Option<&str>, direction: SortDirection) {
        {
            let mut guard = self.write();
            guard.sort.apply(SortInput::External {
                field: field.map(str::to_string),
                direction,
            });
            guard.sort_rows();
        }
        self.mark_dirty();
    }

    /// Replace the sort state outright, including back to unsorted.
    pub fn reset_sort(&self, state: SortState) {
        {
            let mut guard = self.write();
            guard.sort.apply(SortInput::Reset(state));
            guard.sort_rows();
        }
        self.mark_dirty();
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Request a page: a 0-based index for local grids, a 1-based page
    /// number for delegated grids. Out-of-range requests are clamped.
    pub fn on_page_change(&self, page: usize) {
        let event = {
            let mut guard = self.write();
            let len = guard.rows.len();
            let loading = guard.loading;
            guard.pagination.on_page_change(page, len, loading)
        };
        self.mark_dirty();
        self.emit_all(event);
    }

    /// Request a page size. Zero is treated as one.
    pub fn on_page_size_change(&self, size: usize) {
        let event = self.write().pagination.on_page_size_change(size);
        self.mark_dirty();
        self.emit_all(event);
    }

    /// First/previous/next/last page, in either mode.
    pub fn navigate(&self, nav: PageNav) {
        let page = {
            let guard = self.read();
            guard.pagination.resolve(nav, guard.rows.len())
        };
        self.on_page_change(page);
    }

    /// Record what a delegated grid is showing.
    ///
    /// Ignored (with a warning) by local grids, which own their paging.
    pub fn set_page_info(&self, total_rows: Option<usize>, current_page: usize, rows_per_page: usize) {
        match &mut self.write().pagination {
            Pagination::Delegated(pager) => pager.set_page_info(total_rows, current_page, rows_per_page),
            Pagination::Local(_) => {
                warn!(target: "grid_engine::pagination", "{} is local; page info ignored", self.id);
                return;
            }
        }
        self.mark_dirty();
    }

    pub fn page_count(&self) -> usize {
        let guard = self.read();
        guard.pagination.page_count(guard.rows.len())
    }

    pub fn page_size(&self) -> usize {
        self.read().pagination.page_size()
    }

    pub fn page_status(&self) -> PageStatus {
        let guard = self.read();
        guard.pagination.status(guard.rows.len(), guard.loading)
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Change the free-text filter carried in [`Grid::query`].
    ///
    /// Blank text clears the filter. Emits [`GridEvent::FilterChanged`] when
    /// the filter actually changes, and sends the grid back to page 1.
    pub fn set_filter(&self, filter: Option<String>) {
        let filter = filter
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        let events = {
            let mut guard = self.write();
            if guard.filter == filter {
                return;
            }
            guard.filter = filter.clone();
            let mut events = vec![GridEvent::FilterChanged(filter)];
            events.extend(guard.back_to_first_page());
            events
        };
        self.mark_dirty();
        self.emit_all(events);
    }

    pub fn filter(&self) -> Option<String> {
        self.read().filter.clone()
    }

    /// The query a row source needs to reproduce what the grid shows.
    ///
    /// Local grids ask for the whole collection.
    pub fn query(&self) -> RowQuery {
        let guard = self.read();
        let sort = guard.sort.state();
        let (page, page_size) = match &guard.pagination {
            Pagination::Local(_) => (1, None),
            Pagination::Delegated(pager) => (pager.current_page(), Some(pager.rows_per_page())),
        };
        RowQuery {
            page,
            page_size,
            sort_field: sort.field().map(str::to_string),
            sort_direction: sort.direction(),
            filter: guard.filter.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Numbering
    // -------------------------------------------------------------------------

    /// Countdown number of the row at `index_within_page` on the current page.
    pub fn row_number(&self, index_within_page: usize) -> RowNumber {
        let guard = self.read();
        Self::row_number_inner(&guard, index_within_page)
    }

    pub(crate) fn row_number_inner(guard: &GridInner<R>, index_within_page: usize) -> RowNumber {
        let (total, current_page, rows_per_page) = guard.pagination.numbering_basis(guard.rows.len());
        row_number(NumberingInput {
            total,
            current_page,
            rows_per_page,
            index_within_page,
            loading: guard.loading || guard.rows.is_empty(),
        })
    }

    // -------------------------------------------------------------------------
    // Drag gesture
    // -------------------------------------------------------------------------

    /// Pick a row up for dragging.
    ///
    /// Returns false when drag is disabled, the grid is delegated, or the
    /// row is not held.
    pub fn begin_drag(&self, row_id: &str) -> bool {
        {
            let mut guard = self.write();
            if !guard.can_reorder() || !guard.rows.iter().any(|row| row.id() == row_id) {
                return false;
            }
            guard.dragging = Some(row_id.to_string());
        }
        self.mark_dirty();
        true
    }

    /// The row currently picked up, if any.
    pub fn dragging(&self) -> Option<String> {
        self.read().dragging.clone()
    }

    /// Put the picked-up row back without dropping it.
    pub fn cancel_drag(&self) {
        self.write().dragging = None;
        self.mark_dirty();
    }

    /// Whether a reorder session is persisting.
    pub fn is_reordering(&self) -> bool {
        self.read().reorder.is_some()
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Tear the grid down.
    ///
    /// Any reorder session in flight stops issuing updates and its late
    /// completions are ignored.
    pub fn teardown(&self) {
        debug!(target: "grid_engine::grid", "teardown {}", self.id);
        self.shutdown.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Check if the grid changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl<R: GridRow> Clone for Grid<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            events: Arc::clone(&self.events),
            dirty: Arc::clone(&self.dirty),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<R: GridRow> std::fmt::Debug for Grid<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.read();
        f.debug_struct("Grid")
            .field("id", &self.id)
            .field("columns", &guard.columns.len())
            .field("rows", &guard.rows.len())
            .field("sort", guard.sort.state())
            .field("pagination", &guard.pagination)
            .field("loading", &guard.loading)
            .finish()
    }
}
