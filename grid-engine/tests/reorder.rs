mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{Backend, Code, codes, columns, ids, notices, recorder};
use grid_engine::prelude::*;
use grid_engine::reorder::compute_deltas;

fn drag_grid(rows: Vec<Code>) -> Grid<Code> {
    let grid = Grid::builder(columns())
        .config(GridConfig::default().with_drag(true))
        .build()
        .unwrap();
    grid.set_rows(rows);
    grid
}

fn coordinator(grid: &Grid<Code>, backend: &Arc<Backend>) -> ReorderCoordinator<Code> {
    ReorderCoordinator::new(grid.clone(), backend.clone(), backend.clone())
}

// =============================================================================
// Deltas
// =============================================================================

#[test]
fn test_move_up_touches_only_shifted_rows() {
    let mut rows = codes(10);
    grid_engine::reorder::move_item(&mut rows, 4, 1);
    let deltas = compute_deltas(&rows);
    assert_eq!(
        deltas,
        vec![
            OrderDelta { row_id: "C05".into(), rank: 2 },
            OrderDelta { row_id: "C02".into(), rank: 3 },
            OrderDelta { row_id: "C03".into(), rank: 4 },
            OrderDelta { row_id: "C04".into(), rank: 5 },
        ]
    );
}

#[test]
fn test_deltas_compare_stored_rank() {
    // Ranks with gaps are rewritten to positions.
    let mut rows = codes(3);
    rows[2].order = 7;
    let deltas = compute_deltas(&rows);
    assert_eq!(deltas, vec![OrderDelta { row_id: "C03".into(), rank: 3 }]);
}

#[test]
fn test_begin_reorder_applies_optimistically() {
    let grid = drag_grid(codes(5));
    let session = grid.begin_reorder("C01", "C03").unwrap();

    assert_eq!(ids(&grid.rows()), vec!["C02", "C03", "C01", "C04", "C05"]);
    let ranks: Vec<u32> = grid.rows().iter().map(|row| row.order).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    assert_eq!(session.deltas().len(), 3);
    assert!(grid.is_reordering());

    grid.rollback(&session);
    assert_eq!(grid.rows(), codes(5));
    assert!(!grid.is_reordering());
}

// =============================================================================
// Coordinator
// =============================================================================

#[tokio::test]
async fn test_commit_persists_sequentially_and_refreshes() {
    let backend = Arc::new(Backend::with_rows(codes(10)));
    let (sink, events) = recorder();
    let grid = Grid::builder(columns())
        .config(GridConfig::default().with_drag(true))
        .on_event(sink)
        .build()
        .unwrap();
    grid.set_rows(codes(10));
    let (notifier, shown) = notices();
    let coordinator = coordinator(&grid, &backend).with_notifier(notifier);

    let outcome = coordinator.handle_drop("C05", "C02").await;
    assert_eq!(outcome, ReorderOutcome::Committed { changed: 4, refreshed: true });
    assert_eq!(
        backend.calls(),
        vec![
            ("C05".to_string(), 2),
            ("C02".to_string(), 3),
            ("C03".to_string(), 4),
            ("C04".to_string(), 5),
        ]
    );
    assert_eq!(
        ids(&grid.rows())[..5].to_vec(),
        vec!["C01", "C05", "C02", "C03", "C04"]
    );
    assert!(!grid.is_reordering());
    assert_eq!(*events.lock().unwrap(), vec![GridEvent::RowsReordered { changed: 4 }]);

    let shown = shown.lock().unwrap();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].level, NoticeLevel::Success);
    assert_eq!(shown[0].body.as_deref(), Some("4 rows updated"));
}

#[tokio::test]
async fn test_failure_rolls_back_to_snapshot() {
    let backend = Arc::new(Backend {
        fail_on_call: Some(2),
        ..Backend::with_rows(codes(10))
    });
    let grid = drag_grid(codes(10));
    let before = grid.rows();
    let (notifier, shown) = notices();
    let coordinator = coordinator(&grid, &backend).with_notifier(notifier);

    let outcome = coordinator.handle_drop("C05", "C02").await;
    assert_eq!(outcome, ReorderOutcome::RolledBack { discarded: 4 });
    assert_eq!(grid.rows(), before);
    assert_eq!(backend.calls().len(), 2);
    assert!(!grid.is_reordering());

    let shown = shown.lock().unwrap();
    assert_eq!(shown[0].level, NoticeLevel::Error);
    assert_eq!(shown[0].body.as_deref(), Some("Order restored, 4 changes discarded"));
}

#[tokio::test]
async fn test_noop_drops_touch_nothing() {
    let backend = Arc::new(Backend::with_rows(codes(5)));
    let grid = drag_grid(codes(5));
    let coordinator = coordinator(&grid, &backend);

    assert_eq!(coordinator.handle_drop("C02", "C02").await, ReorderOutcome::Unchanged);
    assert_eq!(coordinator.handle_drop("C99", "C02").await, ReorderOutcome::Stale);
    assert_eq!(coordinator.handle_drop("C02", "C99").await, ReorderOutcome::Stale);
    assert!(backend.calls().is_empty());
    assert_eq!(grid.rows(), codes(5));
}

#[tokio::test]
async fn test_drag_disabled_is_unchanged() {
    let backend = Arc::new(Backend::with_rows(codes(5)));
    let grid = Grid::builder(columns()).build().unwrap();
    grid.set_rows(codes(5));
    let coordinator = coordinator(&grid, &backend);

    assert_eq!(coordinator.handle_drop("C01", "C05").await, ReorderOutcome::Unchanged);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_refresh_failure_keeps_optimistic_order() {
    let backend = Arc::new(Backend {
        fail_fetch: true,
        ..Backend::with_rows(codes(5))
    });
    let grid = drag_grid(codes(5));
    let (notifier, shown) = notices();
    let coordinator = coordinator(&grid, &backend).with_notifier(notifier);

    let outcome = coordinator.handle_drop("C05", "C01").await;
    assert_eq!(outcome, ReorderOutcome::Committed { changed: 5, refreshed: false });
    assert_eq!(ids(&grid.rows()), vec!["C05", "C01", "C02", "C03", "C04"]);

    let levels: Vec<NoticeLevel> = shown.lock().unwrap().iter().map(|n| n.level).collect();
    assert_eq!(levels, vec![NoticeLevel::Warning, NoticeLevel::Success]);
}

#[tokio::test]
async fn test_second_drop_while_persisting_is_busy() {
    let backend = Arc::new(Backend {
        delay: Some(Duration::from_millis(30)),
        ..Backend::with_rows(codes(5))
    });
    let grid = drag_grid(codes(5));
    let first = coordinator(&grid, &backend);
    let second = first.clone();

    let running = tokio::spawn(async move { first.handle_drop("C01", "C03").await });
    tokio::time::sleep(Duration::from_millis(5)).await;

    assert_eq!(second.handle_drop("C04", "C05").await, ReorderOutcome::Busy);
    assert_eq!(
        running.await.unwrap(),
        ReorderOutcome::Committed { changed: 3, refreshed: true }
    );
}

#[tokio::test]
async fn test_teardown_cancels_session() {
    let backend = Arc::new(Backend {
        delay: Some(Duration::from_millis(50)),
        ..Backend::with_rows(codes(5))
    });
    let grid = drag_grid(codes(5));
    let (notifier, shown) = notices();
    let coordinator = coordinator(&grid, &backend).with_notifier(notifier);

    let running = tokio::spawn(async move { coordinator.handle_drop("C05", "C01").await });
    tokio::time::sleep(Duration::from_millis(10)).await;
    grid.teardown();

    assert_eq!(running.await.unwrap(), ReorderOutcome::Cancelled);
    assert_eq!(backend.calls().len(), 1);
    assert!(shown.lock().unwrap().is_empty());
    // No rollback after teardown.
    assert_eq!(grid.rows()[0].code, "C05");

    assert_eq!(grid.begin_reorder("C01", "C02").unwrap_err(), ReorderOutcome::Cancelled);
}

// =============================================================================
// Refused drops
// =============================================================================

#[tokio::test]
async fn test_delegated_grid_refuses_drops() {
    let backend = Arc::new(Backend::with_rows(codes(20)));
    let grid = Grid::builder(columns())
        .delegated()
        .config(GridConfig::default().with_drag(true))
        .build()
        .unwrap();
    grid.set_page_info(Some(20), 2, 10);
    grid.set_rows(codes(20)[10..].to_vec());
    let before = grid.rows();

    assert!(!grid.begin_drag("C15"));
    assert!(!grid.view().drag_handle);
    let outcome = coordinator(&grid, &backend).handle_drop("C15", "C12").await;
    assert_eq!(outcome, ReorderOutcome::Unchanged);
    assert!(backend.calls().is_empty());
    assert_eq!(grid.rows(), before);
}

#[tokio::test]
async fn test_drop_refused_while_sorted_by_another_column() {
    let backend = Arc::new(Backend::with_rows(codes(10)));
    let grid = drag_grid(codes(10));
    grid.toggle_sort("CODE").unwrap();
    let before = grid.rows();

    let outcome = coordinator(&grid, &backend).handle_drop("C05", "C02").await;
    assert_eq!(outcome, ReorderOutcome::Unchanged);
    assert!(backend.calls().is_empty());
    assert_eq!(grid.rows(), before);
    assert!(!grid.is_reordering());
}

#[tokio::test]
async fn test_drop_allowed_while_sorted_by_rank_ascending() {
    let rank_columns = vec![
        Column::new("CODE_ORDER", "Order", 5, |row: &Code, _| row.order.to_string().into())
            .sort_by(|a: &Code, b: &Code| a.order.cmp(&b.order)),
    ];
    let grid = Grid::builder(rank_columns)
        .config(GridConfig::default().with_drag(true))
        .build()
        .unwrap();
    grid.set_rows(codes(10));
    let backend = Arc::new(Backend::with_rows(codes(10)));
    let coordinator = coordinator(&grid, &backend);

    grid.toggle_sort("CODE_ORDER").unwrap();
    let outcome = coordinator.handle_drop("C05", "C02").await;
    assert_eq!(outcome, ReorderOutcome::Committed { changed: 4, refreshed: true });
    assert_eq!(ids(&grid.rows())[..3].to_vec(), vec!["C01", "C05", "C02"]);

    grid.toggle_sort("CODE_ORDER").unwrap();
    let calls = backend.calls().len();
    assert_eq!(coordinator.handle_drop("C10", "C08").await, ReorderOutcome::Unchanged);
    assert_eq!(backend.calls().len(), calls);
}

#[tokio::test]
async fn test_move_matching_stored_ranks_applies_locally() {
    let mut rows = codes(3);
    rows[0].order = 2;
    rows[1].order = 1;
    let backend = Arc::new(Backend::with_rows(rows.clone()));
    let grid = drag_grid(rows);

    let outcome = coordinator(&grid, &backend).handle_drop("C01", "C02").await;
    assert_eq!(outcome, ReorderOutcome::Unchanged);
    assert_eq!(ids(&grid.rows()), vec!["C02", "C01", "C03"]);
    assert!(backend.calls().is_empty());
    assert!(!grid.is_reordering());
}
