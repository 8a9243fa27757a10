//! Balance calculation errors.

use kitty_shared::types::BalanceGroupId;
use thiserror::Error;

use crate::repository::RepositoryError;

/// Reasons a balance could not be computed.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// Group does not exist.
    #[error("balance group not found: {0}")]
    GroupNotFound(BalanceGroupId),

    /// Group has an empty member list.
    #[error("balance group has no members")]
    NoMembers,

    /// Sum or share left the decimal range.
    #[error("amount overflow while computing balance")]
    Overflow,

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
