//! Per-member balance within a balance group.
//!
//! `balance = user_spend - total_spend / member_count`. A positive balance means the
//! group owes the user money.

mod calculator;
mod error;


pub use calculator::{BalanceCalculator, compute_balance};
pub use error::BalanceError;
