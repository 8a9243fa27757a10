//! Access control for groups, expenses and accounts.
//!
//! The HTTP layer resolves a [`CurrentUser`] from the request and asks
//! [`AuthorizationPredicates::authorize`] whether a [`Guard`] holds before the
//! handler runs.

mod error;
mod policy;


pub use error::AccessError;
pub use policy::{AuthorizationPredicates, CurrentUser, Guard};
