//! Single-column sort state and its toggle cycle.
//!
//! Once a column has been chosen the grid never returns to an unsorted
//! state: re-activating the sorted column flips the direction, activating
//! another column restarts at ascending.

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ParseSortDirectionError;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The wire form sent to sort-change handlers: `"ASC"` or `"DESC"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, Self::Asc)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ParseSortDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(ParseSortDirectionError(s.to_string()))
        }
    }
}

/// The active sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    field: Option<String>,
    direction: SortDirection,
}

impl SortState {
    /// No column sorted yet.
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// Sorted by `field` in `direction`.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: Some(field.into()),
            direction,
        }
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn is_sorted(&self) -> bool {
        self.field.is_some()
    }

    /// Whether `column_id` is the active field (ASCII case-insensitive).
    pub fn is_active(&self, column_id: &str) -> bool {
        self.field
            .as_deref()
            .is_some_and(|field| field.eq_ignore_ascii_case(column_id))
    }
}

/// A normalized sort change, as delivered to the sort-change handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortChange {
    pub field: String,
    pub direction: SortDirection,
}

/// Header indicator for a sortable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    /// Sortable but not the active column.
    Unsorted,
    Ascending,
    Descending,
}

/// Inputs to the sort reducer.
///
/// Two channels feed the same state: externally supplied overrides (mount,
/// caller-driven resets) and local header toggles. External input replaces
/// the state whenever it arrives; local toggles win between external updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortInput {
    /// A sortable header was activated.
    Toggle(String),
    /// The caller pushed a (field, direction) pair. A `None` field is ignored.
    External {
        field: Option<String>,
        direction: SortDirection,
    },
    /// Re-mount the sort state, including back to unsorted.
    Reset(SortState),
}

/// Owns the sort state of one grid.
#[derive(Debug, Clone, Default)]
pub struct SortController {
    state: SortState,
}

impl SortController {
    pub fn new(initial: SortState) -> Self {
        Self { state: initial }
    }

    /// Current state.
    pub fn state(&self) -> &SortState {
        &self.state
    }

    /// Feed one input into the reducer.
    ///
    /// Returns the change to emit, which only local toggles produce.
    pub fn apply(&mut self, input: SortInput) -> Option<SortChange> {
        match input {
            SortInput::Toggle(column_id) => Some(self.toggle_sort(&column_id)),
            SortInput::External { field, direction } => {
                let field = field?;
                debug!(target: "grid_engine::sort", "external sort override: {} {}", field, direction);
                self.state = SortState::new(field, direction);
                None
            }
            SortInput::Reset(state) => {
                debug!(target: "grid_engine::sort", "sort reset: {:?}", state);
                self.state = state;
                None
            }
        }
    }

    /// Toggle sort for a column.
    ///
    /// If nothing is sorted, or another column is sorted, sorts `column_id`
    /// ascending. If `column_id` is already sorted, flips the direction.
    /// The active field is matched like [`SortState::is_active`] and is
    /// stored as `column_id` afterwards. Callers check sortability before
    /// toggling.
    pub fn toggle_sort(&mut self, column_id: &str) -> SortChange {
        let direction = if self.state.is_active(column_id) {
            self.state.direction.flipped()
        } else {
            SortDirection::Asc
        };
        let next = SortState::new(column_id, direction);
        debug!(
            target: "grid_engine::sort",
            "toggle {}: {:?} -> {:?}",
            column_id, self.state, next
        );
        self.state = next;
        SortChange {
            field: column_id.to_string(),
            direction: self.state.direction,
        }
    }

    /// Indicator to show on a sortable column's header.
    pub fn indicator(&self, column_id: &str) -> SortIndicator {
        if !self.state.is_active(column_id) {
            return SortIndicator::Unsorted;
        }
        match self.state.direction {
            SortDirection::Asc => SortIndicator::Ascending,
            SortDirection::Desc => SortIndicator::Descending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_wire_strings() {
        assert_eq!(SortDirection::Asc.as_str(), "ASC");
        assert_eq!(SortDirection::Desc.to_string(), "DESC");
        assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert_eq!("Asc".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_first_toggle_sorts_ascending() {
        let mut sort = SortController::default();
        let change = sort.toggle_sort("title");
        assert_eq!(change.field, "title");
        assert_eq!(change.direction, SortDirection::Asc);
    }

    #[test]
    fn test_external_none_is_ignored() {
        let mut sort = SortController::new(SortState::new("NTT_ID", SortDirection::Desc));
        let change = sort.apply(SortInput::External {
            field: None,
            direction: SortDirection::Asc,
        });
        assert_eq!(change, None);
        assert_eq!(sort.state(), &SortState::new("NTT_ID", SortDirection::Desc));
    }

    #[test]
    fn test_reset_can_clear() {
        let mut sort = SortController::new(SortState::new("NTT_ID", SortDirection::Desc));
        sort.apply(SortInput::Reset(SortState::unsorted()));
        assert!(!sort.state().is_sorted());
        assert_eq!(sort.indicator("NTT_ID"), SortIndicator::Unsorted);
    }

    #[test]
    fn test_toggle_flips_field_differing_in_case() {
        let mut sort = SortController::new(SortState::new("code", SortDirection::Asc));
        let change = sort.toggle_sort("CODE");
        assert_eq!(change.direction, SortDirection::Desc);
        assert_eq!(sort.state(), &SortState::new("CODE", SortDirection::Desc));
    }

    #[test]
    fn test_indicator_matches_case_insensitively() {
        let sort = SortController::new(SortState::new("ntt_id", SortDirection::Desc));
        assert_eq!(sort.indicator("NTT_ID"), SortIndicator::Descending);
        assert_eq!(sort.indicator("SUBJECT"), SortIndicator::Unsorted);
    }
}
