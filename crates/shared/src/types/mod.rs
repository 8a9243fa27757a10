//! Typed identifiers.

pub mod id;

pub use id::{BalanceGroupId, ExpenseId, UserId};
