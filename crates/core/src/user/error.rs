//! User error types.

use kitty_shared::{AppError, types::UserId};
use thiserror::Error;

use super::policy::PasswordCriterion;
use crate::repository::RepositoryError;

/// User operation errors.
#[derive(Debug, Error)]
pub enum UserError {
    /// No account with this id.
    #[error("User with id {0} not found")]
    NotFound(UserId),

    /// No account with this email.
    #[error("User with email {0} not found")]
    EmailNotFound(String),

    /// Email is taken by another account.
    #[error("User with email {0} already exists")]
    AlreadyExists(String),

    /// Password does not satisfy the policy.
    #[error("Password does not meet requirements: {}", format_criteria(.0))]
    PasswordValidation(Vec<PasswordCriterion>),

    /// Nickname is blank.
    #[error("Nickname cannot be empty or contain whitespace only")]
    NicknameValidation,

    /// Password encoder produced no usable hash.
    #[error("Password encoding failed: {0}")]
    Encoding(String),

    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account is not active.
    #[error("Account is not active")]
    AccountDisabled,

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

fn format_criteria(criteria: &[PasswordCriterion]) -> String {
    let names: Vec<&str> = criteria.iter().map(PasswordCriterion::as_str).collect();
    format!("[{}]", names.join(", "))
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) | UserError::EmailNotFound(_) => Self::NotFound(err.to_string()),
            UserError::AlreadyExists(_) => Self::Conflict(err.to_string()),
            UserError::PasswordValidation(_) | UserError::NicknameValidation => {
                Self::Validation(err.to_string())
            }
            UserError::Encoding(_) => Self::Internal(err.to_string()),
            UserError::InvalidCredentials | UserError::AccountDisabled => {
                Self::Unauthorized(err.to_string())
            }
            UserError::Repository(e) => e.into(),
        }
    }
}
