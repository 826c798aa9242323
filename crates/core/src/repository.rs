//! Errors reported by repository implementations.

use thiserror::Error;

/// Failure reported by a repository implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The requested row does not exist.
    #[error("record not found")]
    NotFound,

    /// Any other storage failure (connectivity, constraint violation, transaction failure).
    #[error("{0}")]
    Storage(String),
}

impl RepositoryError {
    /// Wraps any displayable storage failure.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}
