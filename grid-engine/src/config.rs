//! Grid configuration

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Presentation and behaviour settings for one grid.
///
/// Deserializes with defaults for missing fields, so a configuration file
/// only needs to list what it changes.
///
/// # Example
///
/// ```
/// use grid_engine::GridConfig;
///
/// let config = GridConfig::default()
///     .with_page_size(20)
///     .with_drag(true);
/// assert_eq!(config.page_size, 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Rows per page.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Choices offered by the page size selector.
    ///
    /// Default: 10, 20, 50
    pub page_size_options: Vec<usize>,

    /// Whether a local grid pages its rows at all.
    ///
    /// Default: true
    pub paginate: bool,

    /// Whether rows can be dragged to reorder them.
    ///
    /// Default: false
    pub enable_drag: bool,

    /// Shown instead of a row number while the total is unknown.
    pub placeholder: String,

    /// Body text when there are no rows.
    pub empty_message: String,

    /// Footer text while a fetch is in flight.
    pub loading_label: String,

    /// Skeleton rows drawn while loading.
    ///
    /// Default: 5
    pub skeleton_rows: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            page_size_options: vec![10, 20, 50],
            paginate: true,
            enable_drag: false,
            placeholder: "-".to_string(),
            empty_message: "No data.".to_string(),
            loading_label: "Loading...".to_string(),
            skeleton_rows: 5,
        }
    }
}

impl GridConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    pub fn with_pagination(mut self, paginate: bool) -> Self {
        self.paginate = paginate;
        self
    }

    pub fn with_drag(mut self, enable: bool) -> Self {
        self.enable_drag = enable;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn with_loading_label(mut self, label: impl Into<String>) -> Self {
        self.loading_label = label.into();
        self
    }

    pub fn with_skeleton_rows(mut self, rows: usize) -> Self {
        self.skeleton_rows = rows;
        self
    }

    /// Check the page size settings.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.page_size == 0 {
            return Err(GridError::InvalidPageSize(0));
        }
        if self.page_size_options.is_empty() {
            return Err(GridError::NoPageSizeOptions);
        }
        if self.page_size_options.contains(&0) {
            return Err(GridError::InvalidPageSize(0));
        }
        Ok(())
    }

    /// The page size option after (`step > 0`) or before (`step < 0`)
    /// `current`, staying at the ends of the list.
    pub fn step_page_size(&self, current: usize, step: isize) -> usize {
        let mut options = self.page_size_options.clone();
        options.sort_unstable();
        options.dedup();
        let Some(position) = options.iter().position(|size| *size >= current) else {
            return options.last().copied().unwrap_or(current);
        };
        let exact = options[position] == current;
        let target = match step.signum() {
            1 if exact => position + 1,
            1 => position,
            -1 => position.saturating_sub(1),
            _ => position,
        };
        options.get(target.min(options.len() - 1)).copied().unwrap_or(current)
    }
}
