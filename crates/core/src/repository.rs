//! Errors shared by every persistence port.

use thiserror::Error;
use uuid::Uuid;

/// Failure reported by a repository implementation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// An update targeted a row that does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name.
        entity: &'static str,
        /// Row id.
        id: Uuid,
    },

    /// An update carried a stale version.
    #[error("{entity} {id} was modified concurrently")]
    Conflict {
        /// Entity name.
        entity: &'static str,
        /// Row id.
        id: Uuid,
    },

    /// The underlying store failed.
    #[error("database error: {0}")]
    Database(String),
}

impl RepositoryError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl Into<Uuid>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create a stale version error.
    #[must_use]
    pub fn conflict(entity: &'static str, id: impl Into<Uuid>) -> Self {
        Self::Conflict {
            entity,
            id: id.into(),
        }
    }

    /// Create a database error.
    #[must_use]
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }
}

impl From<RepositoryError> for kitty_shared::AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => Self::NotFound(err.to_string()),
            RepositoryError::Conflict { .. } => Self::Conflict(err.to_string()),
            RepositoryError::Database(msg) => Self::Database(msg),
        }
    }
}
