//! User accounts: registration, profile updates, removal and login checks.

mod error;
mod policy;
mod service;
mod types;


pub use error::UserError;
pub use policy::{PasswordCriterion, check_password, validate_nickname, validate_password};
pub use service::{EmailVerificationSender, UserRepository, UserService};
pub use types::{RegisterUserInput, UpdateUserInput, User};
