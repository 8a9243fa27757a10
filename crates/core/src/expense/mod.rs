//! Expenses logged against balance groups.

mod error;
mod service;
mod types;
mod validator;


pub use error::ExpenseError;
pub use service::{ExpenseRepository, ExpenseService};
pub use types::{Expense, SplitType};
pub use validator::ExpenseValidator;
