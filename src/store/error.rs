use thiserror::Error;

use crate::filter::FilterError;

/// Errors from a DocumentStore
#[derive(Debug, Error)]
pub enum StoreError {
    /// Payload rejected by the collection schema (missing required field).
    #[error("{0}")]
    Validation(String),

    /// Unique key already taken by another document.
    #[error("{0}")]
    Duplicate(String),

    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    /// True when the store refused the payload itself, as opposed to failing to run.
    pub fn is_rejection(&self) -> bool {
        matches!(self, StoreError::Validation(_) | StoreError::Duplicate(_))
    }
}
