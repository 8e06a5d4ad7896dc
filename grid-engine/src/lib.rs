//! Tabular grid engine
//!
//! Sort toggling, local or delegated pagination, countdown row numbering and
//! optimistic drag reordering with rollback, independent of any particular
//! front end or data service.

pub mod column;
pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod notify;
pub mod numbering;
pub mod pagination;
pub mod render;
pub mod reorder;
pub mod row;
pub mod sort;
pub mod source;

pub use column::{Alignment, Cell, Column};
pub use config::GridConfig;
pub use events::{EventSink, GridEvent};
pub use grid::{Grid, GridBuilder, GridId};
pub use numbering::RowNumber;
pub use pagination::{PageNav, PaginationMode};
pub use reorder::{ReorderCoordinator, ReorderOutcome};
pub use row::{GridRow, RankedRow};
pub use sort::{SortDirection, SortState};

pub mod prelude {
    pub use crate::column::{Alignment, Cell, Column};
    pub use crate::config::GridConfig;
    pub use crate::error::{GridError, ReorderError, SourceError, UpdateError};
    pub use crate::events::{DiscardEvents, EventSink, GridEvent};
    pub use crate::grid::{Grid, GridBuilder, GridId};
    pub use crate::notify::{LogNotifier, Notice, NoticeLevel, Notifier};
    pub use crate::numbering::RowNumber;
    pub use crate::pagination::{PageLabel, PageNav, PageStatus, PaginationMode};
    pub use crate::render::{Body, BodyRow, Footer, GridView, HeaderCell, layout_lines};
    pub use crate::reorder::{OrderDelta, ReorderCoordinator, ReorderOutcome};
    pub use crate::row::{GridRow, RankedRow};
    pub use crate::sort::{SortChange, SortDirection, SortIndicator, SortState};
    pub use crate::source::{ItemUpdater, RowPage, RowQuery, RowSource};
}
