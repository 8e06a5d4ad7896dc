//! Drag reordering.
//!
//! A drop moves one row to another row's position. The grid applies the new
//! order at once, then a [`ReorderCoordinator`] writes the changed ranks one
//! at a time through an [`ItemUpdater`], refreshes from the [`RowSource`],
//! and restores the pre-drag order if any write fails.
//!
//! Reordering works on the whole ordered collection, so only local grids
//! accept drops. A drop is also refused while an active local sort would
//! put the moved row back where it came from.
//!
//! Only one session runs per grid. Tearing the grid down cancels the session
//! in flight: no further writes are issued and nothing is restored. Writes
//! that already completed stay persisted.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::ReorderError;
use crate::events::GridEvent;
use crate::grid::Grid;
use crate::notify::{LogNotifier, Notice, Notifier};
use crate::row::{GridRow, RankedRow};
use crate::source::{ItemUpdater, RowSource};

/// A row whose rank changes, with the rank to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDelta {
    pub row_id: String,
    pub rank: u32,
}

/// Move the item at `from` so it ends up at index `to`.
///
/// Out-of-range indices leave `items` untouched.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Rows whose position in `proposed` differs from their stored rank.
///
/// Ranks are 1-based positions. The result is in ascending rank order.
pub fn compute_deltas<R: RankedRow>(proposed: &[R]) -> Vec<OrderDelta> {
    proposed
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let rank = u32::try_from(index + 1).ok()?;
            (row.rank() != rank).then(|| OrderDelta {
                row_id: row.id(),
                rank,
            })
        })
        .collect()
}

/// How a drop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Nothing persisted: same row, no rank changes, drag disabled or
    /// unavailable on a delegated grid, or an active sort that would undo
    /// the move.
    Unchanged,
    /// A dropped row is no longer in the grid.
    Stale,
    /// Another reorder is still persisting.
    Busy,
    /// Every change was persisted. `refreshed` is false when the follow-up
    /// fetch failed and the optimistic order is still shown.
    Committed { changed: usize, refreshed: bool },
    /// A write failed and the pre-drag order was restored.
    RolledBack { discarded: usize },
    /// The grid was torn down mid-session.
    Cancelled,
}

/// One drop in progress.
#[derive(Debug)]
pub struct ReorderSession<R> {
    id: Uuid,
    snapshot: Vec<R>,
    proposed: Vec<R>,
    deltas: Vec<OrderDelta>,
    cancel: CancellationToken,
}

impl<R: RankedRow> ReorderSession<R> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Rows as they were before the drop.
    pub fn snapshot(&self) -> &[R] {
        &self.snapshot
    }

    /// Rows in their new order, carrying their new ranks.
    pub fn proposed(&self) -> &[R] {
        &self.proposed
    }

    pub fn deltas(&self) -> &[OrderDelta] {
        &self.deltas
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn row(&self, row_id: &str) -> Option<&R> {
        self.proposed.iter().find(|row| row.id() == row_id)
    }
}

impl<R: RankedRow> Grid<R> {
    /// Apply a drop optimistically and open a session for persisting it.
    ///
    /// On any no-op the outcome is returned as the error and nothing is
    /// persisted. A move whose ranks already match their new positions is
    /// applied to the held rows only.
    pub fn begin_reorder(&self, source_id: &str, target_id: &str) -> Result<ReorderSession<R>, ReorderOutcome> {
        if self.is_torn_down() {
            return Err(ReorderOutcome::Cancelled);
        }

        let session = {
            let mut guard = self.write();
            if !guard.can_reorder() || source_id == target_id {
                guard.dragging = None;
                return Err(ReorderOutcome::Unchanged);
            }
            if guard.reorder.is_some() {
                return Err(ReorderOutcome::Busy);
            }

            let position = |id: &str| guard.rows.iter().position(|row| row.id() == id);
            let (Some(from), Some(to)) = (position(source_id), position(target_id)) else {
                debug!(
                    target: "grid_engine::reorder",
                    "stale drop {} -> {}", source_id, target_id
                );
                guard.dragging = None;
                return Err(ReorderOutcome::Stale);
            };

            let snapshot = guard.rows.clone();
            let mut proposed = snapshot.clone();
            move_item(&mut proposed, from, to);
            let deltas = compute_deltas(&proposed);
            guard.dragging = None;

            for (index, row) in proposed.iter_mut().enumerate() {
                if let Ok(rank) = u32::try_from(index + 1) {
                    row.set_rank(rank);
                }
            }

            let mut resorted = proposed.clone();
            guard.sort_slice(&mut resorted);
            if !resorted.iter().map(GridRow::id).eq(proposed.iter().map(GridRow::id)) {
                debug!(
                    target: "grid_engine::reorder",
                    "drop {} -> {} refused: active sort {:?} overrides rank order",
                    source_id,
                    target_id,
                    guard.sort.state()
                );
                return Err(ReorderOutcome::Unchanged);
            }

            if deltas.is_empty() {
                guard.rows = proposed;
                self.mark_dirty();
                return Err(ReorderOutcome::Unchanged);
            }
            guard.rows = proposed.clone();

            let cancel = self.shutdown.child_token();
            guard.reorder = Some(cancel.clone());

            ReorderSession {
                id: Uuid::new_v4(),
                snapshot,
                proposed,
                deltas,
                cancel,
            }
        };

        debug!(
            target: "grid_engine::reorder",
            "session {} moves {} -> {}, {} rank changes",
            session.id,
            source_id,
            target_id,
            session.deltas.len()
        );
        self.mark_dirty();
        Ok(session)
    }

    /// Restore the pre-drop order and close the session.
    ///
    /// Does nothing once the session is cancelled.
    pub fn rollback(&self, session: &ReorderSession<R>) {
        if session.is_cancelled() {
            return;
        }
        {
            let mut guard = self.write();
            guard.rows = session.snapshot.clone();
            guard.reorder = None;
        }
        debug!(target: "grid_engine::reorder", "session {} rolled back", session.id);
        self.mark_dirty();
    }

    /// Close the session, keeping whatever rows the grid now holds.
    pub fn finish(&self, session: &ReorderSession<R>) {
        self.write().reorder = None;
        debug!(target: "grid_engine::reorder", "session {} finished", session.id);
        self.mark_dirty();
    }
}

/// Runs drops against the data service.
///
/// # Example
///
/// ```ignore
/// let coordinator = ReorderCoordinator::new(grid.clone(), updater, source)
///     .with_notifier(toasts);
/// tokio::spawn(async move { coordinator.handle_drop(&dragged, &target).await });
/// ```
pub struct ReorderCoordinator<R: RankedRow> {
    grid: Grid<R>,
    updater: Arc<dyn ItemUpdater<R>>,
    source: Arc<dyn RowSource<R>>,
    notifier: Arc<dyn Notifier>,
}

impl<R: RankedRow> ReorderCoordinator<R> {
    pub fn new(grid: Grid<R>, updater: Arc<dyn ItemUpdater<R>>, source: Arc<dyn RowSource<R>>) -> Self {
        Self {
            grid,
            updater,
            source,
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Where success and failure notices go. Defaults to the log.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    pub fn grid(&self) -> &Grid<R> {
        &self.grid
    }

    /// Move `source_id` to `target_id`'s position and persist the result.
    pub async fn handle_drop(&self, source_id: &str, target_id: &str) -> ReorderOutcome {
        let session = match self.grid.begin_reorder(source_id, target_id) {
            Ok(session) => session,
            Err(outcome) => return outcome,
        };
        let changed = session.deltas.len();

        match self.persist(&session).await {
            Ok(()) => {}
            Err(ReorderError::Cancelled) => {
                info!(target: "grid_engine::reorder", "session {} cancelled", session.id);
                return ReorderOutcome::Cancelled;
            }
            Err(err) => {
                warn!(target: "grid_engine::reorder", "session {} failed: {}", session.id, err);
                self.grid.rollback(&session);
                self.notifier.notify(
                    Notice::error("Failed to save order")
                        .with_body(format!("Order restored, {} changes discarded", changed)),
                );
                return ReorderOutcome::RolledBack { discarded: changed };
            }
        }

        let query = self.grid.query();
        let refreshed = tokio::select! {
            biased;
            _ = session.cancel.cancelled() => {
                info!(target: "grid_engine::reorder", "session {} cancelled during refresh", session.id);
                return ReorderOutcome::Cancelled;
            }
            result = self.source.fetch(&query) => result,
        };
        let refreshed = match refreshed {
            Ok(page) => {
                self.grid.load_page(page);
                true
            }
            Err(err) => {
                warn!(target: "grid_engine::reorder", "session {} refresh failed: {}", session.id, err);
                self.notifier.notify(
                    Notice::warning("Order saved, refresh failed").with_body(err.to_string()),
                );
                false
            }
        };

        self.grid.finish(&session);
        self.grid.emit_all([GridEvent::RowsReordered { changed }]);
        self.notifier.notify(
            Notice::success("Order saved").with_body(format!("{} rows updated", changed)),
        );
        ReorderOutcome::Committed { changed, refreshed }
    }

    /// Write each rank change in order, stopping at the first failure.
    async fn persist(&self, session: &ReorderSession<R>) -> Result<(), ReorderError> {
        for delta in &session.deltas {
            let Some(row) = session.row(&delta.row_id) else {
                continue;
            };
            debug!(
                target: "grid_engine::reorder",
                "session {} writes rank {} for {}", session.id, delta.rank, delta.row_id
            );
            tokio::select! {
                biased;
                _ = session.cancel.cancelled() => return Err(ReorderError::Cancelled),
                result = self.updater.update_rank(row, delta.rank) => {
                    result.map_err(|source| ReorderError::Update {
                        row_id: delta.row_id.clone(),
                        rank: delta.rank,
                        source,
                    })?;
                }
            }
        }
        Ok(())
    }
}

impl<R: RankedRow> Clone for ReorderCoordinator<R> {
    fn clone(&self) -> Self {
        Self {
            grid: self.grid.clone(),
            updater: Arc::clone(&self.updater),
            source: Arc::clone(&self.source),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_item() {
        let mut items = vec!['a', 'b', 'c', 'd', 'e'];
        move_item(&mut items, 4, 1);
        assert_eq!(items, vec!['a', 'e', 'b', 'c', 'd']);

        move_item(&mut items, 0, 4);
        assert_eq!(items, vec!['e', 'b', 'c', 'd', 'a']);

        move_item(&mut items, 9, 0);
        assert_eq!(items, vec!['e', 'b', 'c', 'd', 'a']);
    }
}
