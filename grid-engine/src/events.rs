//! Grid events and the sink they are delivered to.
//!
//! The grid never calls back into the data service itself. Sort, page and
//! filter interactions become [`GridEvent`]s; the owner of the grid reacts to
//! them (typically by fetching another page through its row source).

use log::trace;

use crate::sort::SortDirection;

// =============================================================================
// Grid Event Types
// =============================================================================

/// A change intent or notification raised by a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    /// A sortable header was toggled.
    SortChanged {
        field: String,
        direction: SortDirection,
    },
    /// Delegated mode: the user asked for another page (1-based).
    PageChanged(usize),
    /// Delegated mode: the user picked another page size.
    PageSizeChanged(usize),
    /// The free-text filter changed.
    FilterChanged(Option<String>),
    /// A reorder session persisted its order changes.
    RowsReordered { changed: usize },
}

impl GridEvent {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SortChanged { .. } => "sort",
            Self::PageChanged(_) => "page",
            Self::PageSizeChanged(_) => "page_size",
            Self::FilterChanged(_) => "filter",
            Self::RowsReordered { .. } => "reorder",
        }
    }
}

// =============================================================================
// Event Sink
// =============================================================================

/// Receives events raised by a grid.
///
/// Implemented for any `Fn(GridEvent)` closure, so a channel sender can be
/// wired up directly:
///
/// ```
/// use grid_engine::events::{EventSink, GridEvent};
///
/// let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
/// let sink = move |event: GridEvent| {
///     let _ = tx.send(event);
/// };
/// sink.emit(GridEvent::PageChanged(2));
/// assert_eq!(rx.try_recv().ok(), Some(GridEvent::PageChanged(2)));
/// ```
pub trait EventSink: Send + Sync {
    fn emit(&self, event: GridEvent);
}

impl<F> EventSink for F
where
    F: Fn(GridEvent) + Send + Sync,
{
    fn emit(&self, event: GridEvent) {
        self(event)
    }
}

impl EventSink for tokio::sync::mpsc::UnboundedSender<GridEvent> {
    fn emit(&self, event: GridEvent) {
        if self.send(event).is_err() {
            trace!(target: "grid_engine::events", "event receiver closed");
        }
    }
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardEvents;

impl EventSink for DiscardEvents {
    fn emit(&self, event: GridEvent) {
        trace!(target: "grid_engine::events", "discarded {} event", event.kind());
    }
}
