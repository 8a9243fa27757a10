//! Expense error types.

use kitty_shared::{
    AppError,
    types::{BalanceGroupId, ExpenseId},
};
use thiserror::Error;

use crate::repository::RepositoryError;

/// Expense operation errors.
#[derive(Debug, Error)]
pub enum ExpenseError {
    /// Expense not found.
    #[error("Expense with id {0} not found")]
    NotFound(ExpenseId),

    /// Parent balance group not found.
    #[error("Balance group with id {0} not found")]
    BalanceGroupNotFound(BalanceGroupId),

    /// Input breaks an expense rule.
    #[error("{0}")]
    Validation(String),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ExpenseError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<ExpenseError> for AppError {
    fn from(err: ExpenseError) -> Self {
        match err {
            ExpenseError::NotFound(_) | ExpenseError::BalanceGroupNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            ExpenseError::Validation(msg) => Self::Validation(msg),
            ExpenseError::Repository(e) => e.into(),
        }
    }
}
