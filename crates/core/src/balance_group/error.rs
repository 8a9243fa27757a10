//! Balance group error types.

use kitty_shared::{AppError, types::BalanceGroupId};
use thiserror::Error;

use crate::repository::RepositoryError;

/// Balance group operation errors.
#[derive(Debug, Error)]
pub enum BalanceGroupError {
    /// Balance group not found.
    #[error("Balance group with id {0} not found")]
    NotFound(BalanceGroupId),

    /// Input breaks a group rule.
    #[error("{0}")]
    Validation(String),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl BalanceGroupError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<BalanceGroupError> for AppError {
    fn from(err: BalanceGroupError) -> Self {
        match err {
            BalanceGroupError::NotFound(_) => Self::NotFound(err.to_string()),
            BalanceGroupError::Validation(msg) => Self::Validation(msg),
            BalanceGroupError::Repository(e) => e.into(),
        }
    }
}
