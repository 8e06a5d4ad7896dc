//! Row traits.

/// A record that can be displayed as a row in a [`Grid`](crate::Grid).
///
/// Rows are identified by a string id which must be unique within the
/// collection a grid holds. The id drives drag-and-drop lookups and the
/// order delta sent to the data service.
///
/// # Examples
///
/// ```
/// use grid_engine::GridRow;
///
/// #[derive(Debug, Clone)]
/// struct Notice {
///     ntt_id: u64,
///     subject: String,
/// }
///
/// impl GridRow for Notice {
///     fn id(&self) -> String {
///         self.ntt_id.to_string()
///     }
/// }
/// ```
pub trait GridRow: Clone + Send + Sync + 'static {
    /// Unique identifier for this row.
    fn id(&self) -> String;
}

/// A row with a persisted, 1-based display order.
///
/// Required for drag reordering: the coordinator compares each row's stored
/// rank with its rank in the proposed order to decide what must be persisted.
pub trait RankedRow: GridRow {
    /// The persisted order value.
    fn rank(&self) -> u32;

    /// Overwrite the order value.
    fn set_rank(&mut self, rank: u32);
}
