//! Request middleware.

pub mod auth;
pub mod guard;

pub use auth::{AuthUser, auth_middleware};
