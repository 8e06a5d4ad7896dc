//! Grid construction and configuration errors

/// Errors raised while building or configuring a grid.
///
/// Runtime interaction (sorting, paging, dropping rows) never fails with
/// these; invalid input there is clamped or ignored instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Two columns share the same id.
    #[error("duplicate column id: {0}")]
    DuplicateColumn(String),

    /// A page size of zero was configured.
    #[error("invalid page size: {0}")]
    InvalidPageSize(usize),

    /// The page size options list is empty.
    #[error("page size options must not be empty")]
    NoPageSizeOptions,
}

/// Failed to parse a sort direction string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sort direction: {0} (expected ASC or DESC)")]
pub struct ParseSortDirectionError(pub String);
