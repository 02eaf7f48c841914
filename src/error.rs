//! Error taxonomy shared by the store, the exporter, and both shells.
//!
//! Every variant is recoverable from the point of view of the shell: the
//! failing request is reported and the catalog keeps its previous state.

use std::io;
use std::path::PathBuf;

/// Convenience alias used throughout the library.
pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

/// Input problems detected before anything touches the database.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("year must be numeric (got {value:?})")]
    NonNumericYear { value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("book {id} not found")]
    NotFound { id: i64 },
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by user input rather than the environment.
    pub fn is_validation(&self) -> bool {
        matches!(self, CatalogError::Validation(_))
    }
}
