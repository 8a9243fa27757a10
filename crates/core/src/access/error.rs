//! Access control errors.

use kitty_shared::{
    AppError,
    types::{BalanceGroupId, ExpenseId},
};
use thiserror::Error;

use crate::repository::RepositoryError;

/// Access check failures.
#[derive(Debug, Error)]
pub enum AccessError {
    /// No authenticated caller.
    #[error("Authentication required")]
    Unauthenticated,

    /// Caller is authenticated but not allowed.
    #[error("Access denied")]
    Forbidden,

    /// Guarded group does not exist.
    #[error("Balance group with id {0} not found")]
    BalanceGroupNotFound(BalanceGroupId),

    /// Guarded expense does not exist.
    #[error("Expense with id {0} not found")]
    ExpenseNotFound(ExpenseId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthenticated => Self::Unauthorized(err.to_string()),
            AccessError::Forbidden => Self::Forbidden(err.to_string()),
            AccessError::BalanceGroupNotFound(_) | AccessError::ExpenseNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            AccessError::Repository(e) => e.into(),
        }
    }
}
