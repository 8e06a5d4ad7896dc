//! Errors reported by external collaborators

/// Boxed error type for collaborator-specific failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors a [`RowSource`](crate::source::RowSource) can report.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The data service could not be reached.
    #[error("row source unavailable: {0}")]
    Unavailable(String),

    /// The data service answered with a failure result.
    #[error("row source rejected query: {message}")]
    Rejected {
        /// Result code reported by the service, if any.
        code: Option<String>,
        /// Human-readable message.
        message: String,
    },

    /// Any other failure.
    #[error(transparent)]
    Other(#[from] BoxError),
}

impl SourceError {
    /// Creates a rejection without a result code.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            code: None,
            message: message.into(),
        }
    }
}

/// Errors an [`ItemUpdater`](crate::source::ItemUpdater) can report.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// The data service could not be reached.
    #[error("update failed, service unavailable: {0}")]
    Unavailable(String),

    /// The service refused to update the row.
    #[error("update of row {row_id} rejected: {message}")]
    Rejected {
        /// Identity of the row that was refused.
        row_id: String,
        /// Human-readable message.
        message: String,
    },

    /// Any other failure.
    #[error(transparent)]
    Other(#[from] BoxError),
}

impl UpdateError {
    /// Creates a rejection for a row.
    pub fn rejected(row_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            row_id: row_id.into(),
            message: message.into(),
        }
    }
}

/// Why a reorder session could not be committed.
#[derive(Debug, thiserror::Error)]
pub enum ReorderError {
    /// An order update was refused or failed.
    #[error("failed to persist rank {rank} for row {row_id}: {source}")]
    Update {
        /// Row whose update failed.
        row_id: String,
        /// Rank that was being written.
        rank: u32,
        /// Underlying collaborator error.
        #[source]
        source: UpdateError,
    },

    /// The grid was torn down while the session was in flight.
    #[error("reorder cancelled")]
    Cancelled,
}
