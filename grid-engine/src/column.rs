//! Column descriptors and cell content.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Rendered content of a header or body cell.
///
/// The grid never inspects cell content; it only carries it from the
/// column's producer to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell(String);

impl Cell {
    /// Create a cell from displayable text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// An empty cell.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// The cell text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the cell and return its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

type HeaderFn = Arc<dyn Fn() -> Cell + Send + Sync>;
type CellFn<R> = Arc<dyn Fn(&R, usize) -> Cell + Send + Sync>;
type CompareFn<R> = Arc<dyn Fn(&R, &R) -> Ordering + Send + Sync>;

/// What a column displays in body rows.
pub(crate) enum ColumnKind<R> {
    /// Content produced by a cell function of the row.
    Data(CellFn<R>),
    /// The row's countdown ordinal (see [`crate::numbering`]).
    RowNumber,
}

/// Column configuration.
///
/// A column has a unique id (which doubles as the sort field name sent to
/// the data service), a header, a fixed display width, an alignment, and a
/// cell producer. Data columns are sortable unless
/// [`unsortable`](Column::unsortable) is called; [`sort_by`](Column::sort_by)
/// adds a comparator for grids that sort their own rows.
///
/// # Examples
///
/// ```
/// use grid_engine::{Alignment, Column};
///
/// #[derive(Clone)]
/// struct Code {
///     code: String,
///     name: String,
/// }
///
/// let columns: Vec<Column<Code>> = vec![
///     Column::row_number("no", "NO", 5).align(Alignment::Center),
///     Column::new("CODE", "Code", 10, |row: &Code, _| row.code.clone().into())
///         .sort_by(|a: &Code, b: &Code| a.code.cmp(&b.code)),
///     Column::new("CODE_NM", "Name", 24, |row: &Code, _| row.name.clone().into()).unsortable(),
/// ];
/// assert!(columns[1].is_sortable());
/// assert!(!columns[2].is_sortable());
/// ```
pub struct Column<R> {
    id: String,
    header: HeaderFn,
    kind: ColumnKind<R>,
    width: u16,
    align: Alignment,
    sortable: bool,
    comparator: Option<CompareFn<R>>,
}

impl<R> Column<R> {
    /// Create a data column.
    ///
    /// # Arguments
    /// * `id` - Unique column id, also used as the sort field
    /// * `header` - Header text
    /// * `width` - Width in terminal columns
    /// * `cell` - Produces the cell for `(row, row_index)`
    pub fn new(
        id: impl Into<String>,
        header: impl Into<String>,
        width: u16,
        cell: impl Fn(&R, usize) -> Cell + Send + Sync + 'static,
    ) -> Self {
        let header = Cell::new(header);
        Self {
            id: id.into(),
            header: Arc::new(move || header.clone()),
            kind: ColumnKind::Data(Arc::new(cell)),
            width,
            align: Alignment::Left,
            sortable: true,
            comparator: None,
        }
    }

    /// Create a column that shows each row's countdown number.
    ///
    /// Row number columns are never sortable.
    pub fn row_number(id: impl Into<String>, header: impl Into<String>, width: u16) -> Self {
        let header = Cell::new(header);
        Self {
            id: id.into(),
            header: Arc::new(move || header.clone()),
            kind: ColumnKind::RowNumber,
            width,
            align: Alignment::Right,
            sortable: false,
            comparator: None,
        }
    }

    /// Replace the header producer.
    pub fn header_with(mut self, header: impl Fn() -> Cell + Send + Sync + 'static) -> Self {
        self.header = Arc::new(header);
        self
    }

    /// Set the column alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Opt the column out of sorting.
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self.comparator = None;
        self
    }

    /// Give the column a comparator for locally owned sorting.
    ///
    /// Without one the grid only records the sort state and emits the
    /// change; ordering the rows is left to whoever owns the data.
    pub fn sort_by(mut self, compare: impl Fn(&R, &R) -> Ordering + Send + Sync + 'static) -> Self {
        if matches!(self.kind, ColumnKind::Data(_)) {
            self.sortable = true;
            self.comparator = Some(Arc::new(compare));
        }
        self
    }

    /// The column id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Produce the header cell.
    pub fn header(&self) -> Cell {
        (self.header)()
    }

    /// Produce the body cell for a row.
    ///
    /// Row number columns return an empty cell here; the grid fills them in
    /// from the numbering policy.
    pub fn cell(&self, row: &R, index: usize) -> Cell {
        match &self.kind {
            ColumnKind::Data(cell) => cell(row, index),
            ColumnKind::RowNumber => Cell::empty(),
        }
    }

    /// Display width in terminal columns.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Horizontal alignment.
    pub fn alignment(&self) -> Alignment {
        self.align
    }

    /// Whether header activation toggles sorting on this column.
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Whether this column shows row numbers.
    pub fn is_row_number(&self) -> bool {
        matches!(self.kind, ColumnKind::RowNumber)
    }

    /// Compare two rows with the column's comparator, if it has one.
    pub fn compare(&self, a: &R, b: &R) -> Option<Ordering> {
        self.comparator.as_ref().map(|compare| compare(a, b))
    }

    /// Whether the column can order rows locally.
    pub fn has_comparator(&self) -> bool {
        self.comparator.is_some()
    }
}

impl<R> Clone for ColumnKind<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Data(cell) => Self::Data(Arc::clone(cell)),
            Self::RowNumber => Self::RowNumber,
        }
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: Arc::clone(&self.header),
            kind: self.kind.clone(),
            width: self.width,
            align: self.align,
            sortable: self.sortable,
            comparator: self.comparator.clone(),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header())
            .field("width", &self.width)
            .field("align", &self.align)
            .field("sortable", &self.sortable)
            .field("row_number", &self.is_row_number())
            .field("comparator", &self.comparator.is_some())
            .finish()
    }
}
