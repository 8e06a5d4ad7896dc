//! Grid rendering.
//!
//! [`Grid::view`] takes a snapshot of everything a front end needs to paint
//! the grid: header cells with their sort indicators, body rows with their
//! countdown numbers, and the pagination footer. [`layout_lines`] turns a
//! view into fixed-width text lines for terminal output.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::column::{Alignment, Cell};
use crate::grid::Grid;
use crate::numbering::RowNumber;
use crate::pagination::{PageLabel, PageStatus, Pagination};
use crate::row::GridRow;
use crate::sort::SortIndicator;

/// Width of the drag handle column.
pub const HANDLE_WIDTH: u16 = 2;

const HANDLE: &str = "≡";
const PICKED: &str = "»";
const SKELETON: char = '░';
const ELLIPSIS: char = '…';

// =============================================================================
// View Model
// =============================================================================

/// One header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub id: String,
    pub content: Cell,
    pub align: Alignment,
    pub width: u16,
    /// `None` for columns that cannot be sorted.
    pub indicator: Option<SortIndicator>,
}

impl HeaderCell {
    /// Header text with the indicator placed so the label does not shift.
    ///
    /// Left-aligned labels get the arrow after them, right-aligned labels
    /// before them, and centered labels on whichever side has more room.
    pub fn label(&self) -> String {
        let arrow = match self.indicator {
            Some(SortIndicator::Ascending) => "▲",
            Some(SortIndicator::Descending) => "▼",
            Some(SortIndicator::Unsorted) | None => return self.content.to_string(),
        };
        let text = self.content.as_str();
        match self.align {
            Alignment::Left => format!("{} {}", text, arrow),
            Alignment::Right => format!("{} {}", arrow, text),
            Alignment::Center => {
                let spare = usize::from(self.width).saturating_sub(text.width());
                let left = spare / 2;
                if left >= spare - left {
                    format!("{} {}", arrow, text)
                } else {
                    format!("{} {}", text, arrow)
                }
            }
        }
    }
}

/// One body row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyRow {
    pub id: String,
    pub number: RowNumber,
    /// One cell per column; row number columns carry the number text.
    pub cells: Vec<Cell>,
    /// The row is picked up for dragging.
    pub picked: bool,
}

/// What the body shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Skeleton rows while a fetch is in flight.
    Loading { rows: usize },
    /// No rows; carries the message to show.
    Empty(String),
    Rows(Vec<BodyRow>),
}

/// Pagination footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub status: PageStatus,
    pub page_size_options: Vec<usize>,
    /// `"{first} - {last} / {total}"`, the loading label, or the placeholder.
    pub range_text: String,
    /// `"{current} / {count}"`, or the placeholder.
    pub page_text: String,
}

/// Snapshot of a grid ready to paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
    pub header: Vec<HeaderCell>,
    pub body: Body,
    /// `None` for unpaginated local grids.
    pub footer: Option<Footer>,
    /// Draw a drag handle column before the first column. Only local grids
    /// with drag enabled get one.
    pub drag_handle: bool,
    /// Reorder persistence is in flight.
    pub busy: bool,
}

impl<R: GridRow> Grid<R> {
    /// Snapshot the grid for rendering.
    pub fn view(&self) -> GridView {
        let guard = self.read();
        let config = &guard.config;

        let header = guard
            .columns
            .iter()
            .map(|column| HeaderCell {
                id: column.id().to_string(),
                content: column.header(),
                align: column.alignment(),
                width: column.width(),
                indicator: column.is_sortable().then(|| guard.sort.indicator(column.id())),
            })
            .collect();

        let visible = guard.pagination.current_rows(&guard.rows);
        let body = if guard.loading {
            Body::Loading {
                rows: config.skeleton_rows,
            }
        } else if visible.is_empty() {
            Body::Empty(config.empty_message.clone())
        } else {
            let rows = visible
                .iter()
                .enumerate()
                .map(|(index, row)| {
                    let number = Self::row_number_inner(&guard, index);
                    let cells = guard
                        .columns
                        .iter()
                        .map(|column| {
                            if column.is_row_number() {
                                Cell::new(number.display(&config.placeholder))
                            } else {
                                column.cell(row, index)
                            }
                        })
                        .collect();
                    let id = row.id();
                    BodyRow {
                        picked: guard.dragging.as_deref() == Some(id.as_str()),
                        id,
                        number,
                        cells,
                    }
                })
                .collect();
            Body::Rows(rows)
        };

        let paginated = match &guard.pagination {
            Pagination::Local(pager) => pager.is_paginated(),
            Pagination::Delegated(_) => true,
        };
        let footer = paginated.then(|| {
            let status = guard.pagination.status(guard.rows.len(), guard.loading);
            let range_text = match (&status.label, status.range) {
                (PageLabel::Loading, _) => config.loading_label.clone(),
                (_, Some((first, last, total))) => format!("{} - {} / {}", first, last, total),
                (_, None) => config.placeholder.clone(),
            };
            let page_text = match status.label {
                PageLabel::Page { current, count } => format!("{} / {}", current, count),
                PageLabel::Loading | PageLabel::Empty => config.placeholder.clone(),
            };
            Footer {
                status,
                page_size_options: config.page_size_options.clone(),
                range_text,
                page_text,
            }
        });

        GridView {
            header,
            body,
            footer,
            drag_handle: guard.can_reorder(),
            busy: guard.reorder.is_some(),
        }
    }
}

// =============================================================================
// Text Layout
// =============================================================================

/// Cut `text` to `width` display columns, ending in an ellipsis when cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push(ELLIPSIS);
    out
}

/// Truncate and pad `text` to exactly `width` display columns.
pub fn fit(text: &str, width: usize, align: Alignment) -> String {
    let text = truncate(text, width);
    let spare = width.saturating_sub(text.width());
    let (left, right) = match align {
        Alignment::Left => (0, spare),
        Alignment::Right => (spare, 0),
        Alignment::Center => (spare / 2, spare - spare / 2),
    };
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

fn handle_cell(view: &GridView, marker: &str) -> Option<String> {
    view.drag_handle
        .then(|| fit(marker, usize::from(HANDLE_WIDTH), Alignment::Left))
}

fn join(handle: Option<String>, cells: impl Iterator<Item = String>) -> String {
    handle
        .into_iter()
        .chain(cells)
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}

/// Lay a view out as text: header, separator, body, and footer lines.
///
/// # Example
///
/// ```
/// use grid_engine::render::{Body, GridView, HeaderCell, layout_lines};
/// use grid_engine::{Alignment, Cell};
///
/// let view = GridView {
///     header: vec![HeaderCell {
///         id: "name".into(),
///         content: Cell::new("Name"),
///         align: Alignment::Left,
///         width: 6,
///         indicator: None,
///     }],
///     body: Body::Empty("No data.".into()),
///     footer: None,
///     drag_handle: false,
///     busy: false,
/// };
/// assert_eq!(layout_lines(&view), vec!["Name", "──────", "No data."]);
/// ```
pub fn layout_lines(view: &GridView) -> Vec<String> {
    let widths: Vec<usize> = view.header.iter().map(|cell| usize::from(cell.width)).collect();
    let mut lines = Vec::new();

    lines.push(join(
        handle_cell(view, ""),
        view.header
            .iter()
            .map(|cell| fit(&cell.label(), usize::from(cell.width), cell.align)),
    ));

    let total_width = widths.iter().sum::<usize>()
        + widths.len().saturating_sub(1)
        + if view.drag_handle { usize::from(HANDLE_WIDTH) + 1 } else { 0 };
    lines.push("─".repeat(total_width));

    match &view.body {
        Body::Loading { rows } => {
            for _ in 0..*rows {
                lines.push(join(
                    handle_cell(view, ""),
                    widths
                        .iter()
                        .map(|width| SKELETON.to_string().repeat(width.saturating_sub(1))),
                ));
            }
        }
        Body::Empty(message) => lines.push(message.clone()),
        Body::Rows(rows) => {
            for row in rows {
                let marker = if row.picked { PICKED } else { HANDLE };
                lines.push(join(
                    handle_cell(view, marker),
                    row.cells
                        .iter()
                        .zip(&view.header)
                        .map(|(cell, header)| fit(cell.as_str(), usize::from(header.width), header.align)),
                ));
            }
        }
    }

    if let Some(footer) = &view.footer {
        let previous = if footer.status.can_previous { "‹" } else { " " };
        let next = if footer.status.can_next { "›" } else { " " };
        lines.push(format!(
            "{}  {} {} {}  [{}/page]",
            footer.range_text, previous, footer.page_text, next, footer.status.page_size
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_wide_chars() {
        assert_eq!(truncate("공지사항", 8), "공지사항");
        assert_eq!(truncate("공지사항", 7), "공지사…");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_fit_alignment() {
        assert_eq!(fit("ab", 5, Alignment::Left), "ab   ");
        assert_eq!(fit("ab", 5, Alignment::Right), "   ab");
        assert_eq!(fit("ab", 5, Alignment::Center), " ab  ");
    }

    #[test]
    fn test_indicator_placement() {
        let mut cell = HeaderCell {
            id: "n".into(),
            content: Cell::new("Name"),
            align: Alignment::Left,
            width: 10,
            indicator: Some(SortIndicator::Ascending),
        };
        assert_eq!(cell.label(), "Name ▲");

        cell.align = Alignment::Right;
        cell.indicator = Some(SortIndicator::Descending);
        assert_eq!(cell.label(), "▼ Name");

        cell.indicator = Some(SortIndicator::Unsorted);
        assert_eq!(cell.label(), "Name");
    }
}
