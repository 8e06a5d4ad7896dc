//! Countdown row numbers.
//!
//! Rows are numbered from the total record count downwards, so the newest
//! record on the first page carries the highest number and a record keeps
//! its number no matter which page shows it.

use std::fmt;

/// A row's displayed ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowNumber {
    Number(usize),
    /// The total is unknown or stale (loading, empty).
    Placeholder,
}

impl RowNumber {
    pub fn value(&self) -> Option<usize> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Placeholder => None,
        }
    }

    /// Text for display, using `placeholder` when there is no number.
    pub fn display(&self, placeholder: &str) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Placeholder => placeholder.to_string(),
        }
    }
}

impl fmt::Display for RowNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Placeholder => f.write_str("-"),
        }
    }
}

/// Inputs to [`row_number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberingInput {
    /// Total record count across all pages, if known.
    pub total: Option<usize>,
    /// 1-based page being displayed.
    pub current_page: usize,
    pub rows_per_page: usize,
    /// 0-based position of the row on the displayed page.
    pub index_within_page: usize,
    pub loading: bool,
}

/// `total - ((current_page - 1) * rows_per_page + index_within_page)`.
///
/// Falls back to [`RowNumber::Placeholder`] while loading, when the total is
/// unknown or zero, and when the position lies past the total (a stale
/// count from a previous fetch) or does not fit in a `usize`.
pub fn row_number(input: NumberingInput) -> RowNumber {
    if input.loading {
        return RowNumber::Placeholder;
    }
    let Some(total) = input.total.filter(|total| *total > 0) else {
        return RowNumber::Placeholder;
    };
    let position = input
        .current_page
        .saturating_sub(1)
        .checked_mul(input.rows_per_page.max(1))
        .and_then(|offset| offset.checked_add(input.index_within_page));
    match position {
        Some(position) if position < total => RowNumber::Number(total - position),
        _ => RowNumber::Placeholder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(total: Option<usize>, page: usize, per_page: usize, index: usize) -> NumberingInput {
        NumberingInput {
            total,
            current_page: page,
            rows_per_page: per_page,
            index_within_page: index,
            loading: false,
        }
    }

    #[test]
    fn test_second_page_first_row() {
        assert_eq!(row_number(input(Some(47), 2, 10, 0)), RowNumber::Number(37));
    }

    #[test]
    fn test_last_row_is_one() {
        assert_eq!(row_number(input(Some(47), 5, 10, 6)), RowNumber::Number(1));
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(row_number(input(None, 1, 10, 0)), RowNumber::Placeholder);
        assert_eq!(row_number(input(Some(0), 1, 10, 0)), RowNumber::Placeholder);
        assert_eq!(row_number(input(Some(5), 2, 10, 0)), RowNumber::Placeholder);
        assert_eq!(row_number(input(Some(47), usize::MAX, 10, 0)), RowNumber::Placeholder);
        assert_eq!(row_number(input(Some(47), 2, usize::MAX, 3)), RowNumber::Placeholder);

        let loading = NumberingInput {
            loading: true,
            ..input(Some(47), 1, 10, 0)
        };
        assert_eq!(row_number(loading), RowNumber::Placeholder);
    }

    #[test]
    fn test_display() {
        assert_eq!(RowNumber::Number(12).display("-"), "12");
        assert_eq!(RowNumber::Placeholder.display("·"), "·");
    }
}
