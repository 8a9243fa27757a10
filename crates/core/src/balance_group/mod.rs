//! Balance groups: validation rules and CRUD orchestration.

mod error;
mod service;
mod types;
mod validator;

#[cfg(test)]
mod tests;

pub use error::BalanceGroupError;
pub use service::{BalanceGroupRepository, BalanceGroupService};
pub use types::{BalanceGroup, membership_with_owner};
pub use validator::BalanceGroupValidator;
