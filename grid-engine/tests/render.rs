mod common;

use common::{Code, codes, columns};
use grid_engine::prelude::*;

fn header_labels(view: &GridView) -> Vec<String> {
    view.header.iter().map(HeaderCell::label).collect()
}

#[test]
fn test_header_indicators() {
    let grid = Grid::builder(columns()).local().build().unwrap();
    let view = grid.view();
    assert_eq!(view.header[0].indicator, None);
    assert_eq!(view.header[1].indicator, Some(SortIndicator::Unsorted));
    assert_eq!(view.header[4].indicator, None);

    grid.toggle_sort("CODE").unwrap();
    grid.toggle_sort("CODE_ORDER").unwrap();
    grid.toggle_sort("CODE_ORDER").unwrap();
    let view = grid.view();
    assert_eq!(view.header[1].indicator, Some(SortIndicator::Unsorted));
    assert_eq!(header_labels(&view)[3], "▼ Order");
}

#[test]
fn test_body_rows_carry_numbers() {
    let grid = Grid::builder(columns()).delegated().build().unwrap();
    grid.set_page_info(Some(47), 2, 10);
    grid.set_rows(codes(10));

    let Body::Rows(rows) = grid.view().body else {
        panic!("expected rows");
    };
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0].number, RowNumber::Number(37));
    assert_eq!(rows[0].cells[0].as_str(), "37");
    assert_eq!(rows[0].cells[1].as_str(), "C01");
    assert_eq!(rows[0].cells[4].as_str(), "");
}

#[test]
fn test_loading_and_empty_bodies() {
    let config = GridConfig::default()
        .with_skeleton_rows(3)
        .with_empty_message("Nothing here");
    let grid = Grid::<Code>::builder(columns()).config(config).build().unwrap();
    assert_eq!(grid.view().body, Body::Empty("Nothing here".into()));

    grid.set_loading(true);
    assert_eq!(grid.view().body, Body::Loading { rows: 3 });
    let lines = layout_lines(&grid.view());
    assert_eq!(lines.len(), 2 + 3 + 1);
    assert!(lines[2].starts_with("░░░"));
}

#[test]
fn test_footer_text() {
    let grid = Grid::builder(columns()).delegated().build().unwrap();
    grid.set_page_info(Some(47), 5, 10);
    grid.set_rows(codes(7));
    let footer = grid.view().footer.unwrap();
    assert_eq!(footer.range_text, "41 - 47 / 47");
    assert_eq!(footer.page_text, "5 / 5");
    assert_eq!(footer.page_size_options, vec![10, 20, 50]);

    grid.set_loading(true);
    let footer = grid.view().footer.unwrap();
    assert_eq!(footer.range_text, "Loading...");
    assert_eq!(footer.page_text, "-");
}

#[test]
fn test_drag_handle_column_and_pick() {
    let grid = Grid::builder(columns())
        .config(GridConfig::default().with_drag(true))
        .build()
        .unwrap();
    grid.set_rows(codes(3));
    assert!(grid.begin_drag("C02"));

    let view = grid.view();
    assert!(view.drag_handle);
    let lines = layout_lines(&view);
    assert!(lines[0].starts_with("     No"));
    assert!(lines[2].starts_with("≡"));
    assert!(lines[3].starts_with("»"));
    assert!(lines[2].contains("   3 C01"));
}

#[test]
fn test_drag_disabled_refuses_pick() {
    let grid = Grid::builder(columns()).build().unwrap();
    grid.set_rows(codes(3));
    assert!(!grid.begin_drag("C01"));
    assert_eq!(grid.dragging(), None);
}

#[test]
fn test_huge_page_numbers_clamp_instead_of_overflowing() {
    let grid = Grid::builder(columns()).delegated().build().unwrap();
    grid.set_page_info(Some(47), usize::MAX, 10);
    grid.set_rows(codes(7));
    let view = grid.view();
    let Body::Rows(rows) = &view.body else {
        panic!("expected rows");
    };
    assert_eq!(rows[0].number, RowNumber::Number(7));
    assert_eq!(view.footer.unwrap().page_text, "5 / 5");

    grid.set_page_info(None, usize::MAX, usize::MAX);
    let view = grid.view();
    let Body::Rows(rows) = &view.body else {
        panic!("expected rows");
    };
    assert_eq!(rows[0].number, RowNumber::Placeholder);
    assert_eq!(view.footer.unwrap().range_text, "-");
}
