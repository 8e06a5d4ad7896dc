mod common;

use common::{Code, codes, columns, ids, recorder};
use grid_engine::prelude::*;

fn local_grid() -> (Grid<Code>, std::sync::Arc<std::sync::Mutex<Vec<GridEvent>>>) {
    let (sink, events) = recorder();
    let grid = Grid::builder(columns()).local().on_event(sink).build().unwrap();
    (grid, events)
}

// =============================================================================
// Toggle state machine
// =============================================================================

#[test]
fn test_toggle_cycle_on_one_column() {
    let (grid, events) = local_grid();

    let first = grid.toggle_sort("CODE_NM").unwrap();
    assert_eq!(first.direction, SortDirection::Asc);
    let second = grid.toggle_sort("CODE_NM").unwrap();
    assert_eq!(second.direction, SortDirection::Desc);
    let third = grid.toggle_sort("CODE_NM").unwrap();
    assert_eq!(third.direction, SortDirection::Asc);

    let directions: Vec<&str> = events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|event| match event {
            GridEvent::SortChanged { field, direction } if field == "CODE_NM" => Some(direction.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(directions, vec!["ASC", "DESC", "ASC"]);
}

#[test]
fn test_switching_column_starts_ascending() {
    let (grid, _) = local_grid();
    grid.toggle_sort("CODE").unwrap();
    grid.toggle_sort("CODE").unwrap();
    assert_eq!(grid.sort_state().direction(), SortDirection::Desc);

    let change = grid.toggle_sort("CODE_NM").unwrap();
    assert_eq!(change.field, "CODE_NM");
    assert_eq!(change.direction, SortDirection::Asc);
}

#[test]
fn test_unsortable_columns_are_ignored() {
    let (grid, events) = local_grid();
    assert!(grid.toggle_sort("NOTE").is_none());
    assert!(grid.toggle_sort("no").is_none());
    assert!(grid.toggle_sort("MISSING").is_none());
    assert!(!grid.sort_state().is_sorted());
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_reclick_flips_field_synced_in_other_case() {
    let grid = Grid::builder(columns())
        .local()
        .initial_sort(SortState::new("code", SortDirection::Asc))
        .build()
        .unwrap();
    let indicator = grid.view().header.into_iter().find(|cell| cell.id == "CODE").and_then(|cell| cell.indicator);
    assert_eq!(indicator, Some(SortIndicator::Ascending));

    let change = grid.toggle_sort("CODE").unwrap();
    assert_eq!(change.direction, SortDirection::Desc);
    assert_eq!(grid.sort_state(), SortState::new("CODE", SortDirection::Desc));
}

#[test]
fn test_data_columns_sortable_by_default() {
    let sortable: Vec<(String, bool)> = columns()
        .iter()
        .map(|column| (column.id().to_string(), column.is_sortable()))
        .collect();
    assert_eq!(
        sortable,
        vec![
            ("no".to_string(), false),
            ("CODE".to_string(), true),
            ("CODE_NM".to_string(), true),
            ("CODE_ORDER".to_string(), true),
            ("NOTE".to_string(), false),
        ]
    );
}

// =============================================================================
// Local ordering
// =============================================================================

#[test]
fn test_local_sort_reorders_rows() {
    let (grid, _) = local_grid();
    grid.set_rows(codes(3));

    grid.toggle_sort("CODE").unwrap();
    assert_eq!(ids(&grid.visible_rows()), vec!["C01", "C02", "C03"]);

    grid.toggle_sort("CODE").unwrap();
    assert_eq!(ids(&grid.visible_rows()), vec!["C03", "C02", "C01"]);
}

#[test]
fn test_sort_without_comparator_keeps_order() {
    let (grid, events) = local_grid();
    let mut rows = codes(3);
    rows.reverse();
    grid.set_rows(rows);

    grid.toggle_sort("CODE_ORDER").unwrap();
    assert_eq!(ids(&grid.rows()), vec!["C03", "C02", "C01"]);
    assert_eq!(events.lock().unwrap().len(), 1);
}

#[test]
fn test_local_sort_returns_to_first_page() {
    let (grid, _) = local_grid();
    grid.set_rows(codes(25));
    grid.on_page_change(2);
    assert_eq!(grid.page_status().label, PageLabel::Page { current: 3, count: 3 });

    grid.toggle_sort("CODE").unwrap();
    assert_eq!(grid.page_status().label, PageLabel::Page { current: 1, count: 3 });
}

#[test]
fn test_set_rows_reapplies_sort() {
    let (grid, _) = local_grid();
    grid.toggle_sort("CODE").unwrap();
    grid.toggle_sort("CODE").unwrap();
    grid.set_rows(codes(4));
    assert_eq!(grid.rows()[0].code, "C04");
}

// =============================================================================
// External input channel
// =============================================================================

#[test]
fn test_initial_sort_and_external_override() {
    let (sink, events) = recorder();
    let grid = Grid::builder(columns())
        .delegated()
        .initial_sort(SortState::new("CODE_ORDER", SortDirection::Desc))
        .on_event(sink)
        .build()
        .unwrap();
    assert_eq!(grid.sort_state().field(), Some("CODE_ORDER"));

    grid.sync_sort(Some("CODE_NM"), SortDirection::Asc);
    assert_eq!(grid.sort_state(), SortState::new("CODE_NM", SortDirection::Asc));

    // A missing field leaves the state alone.
    grid.sync_sort(None, SortDirection::Desc);
    assert_eq!(grid.sort_state(), SortState::new("CODE_NM", SortDirection::Asc));

    grid.reset_sort(SortState::unsorted());
    assert!(!grid.sort_state().is_sorted());
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_delegated_sort_asks_for_first_page() {
    let (sink, events) = recorder();
    let grid = Grid::<Code>::builder(columns()).delegated().on_event(sink).build().unwrap();
    grid.set_page_info(Some(47), 3, 10);

    grid.toggle_sort("CODE").unwrap();
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            GridEvent::SortChanged {
                field: "CODE".into(),
                direction: SortDirection::Asc
            },
            GridEvent::PageChanged(1),
        ]
    );
}

#[test]
fn test_direction_parsing_and_serde() {
    assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
    assert!("up".parse::<SortDirection>().is_err());

    let state = SortState::new("CODE_NM", SortDirection::Desc);
    let json = serde_json::to_string(&state).unwrap();
    assert!(json.contains("\"DESC\""));
    assert_eq!(serde_json::from_str::<SortState>(&json).unwrap(), state);
}
