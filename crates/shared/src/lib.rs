//! Shared types, errors, and configuration for Kitty.
//!
//! This crate provides common pieces used across all other crates:
//! - Typed IDs for users, balance groups and expenses
//! - Application-wide error type with HTTP status mapping
//! - Configuration loading
//! - JWT issuing and validation
//! - SMTP email transport

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::{AppConfig, EmailConfig};
pub use email::{EmailError, EmailService};
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};
