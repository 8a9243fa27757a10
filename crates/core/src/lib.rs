//! Core business logic for Kitty.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Domain types, validation rules, the balance arithmetic and the ports that the
//! database and HTTP layers implement all live here.
//!
//! # Modules
//!
//! - `user` - Account registration, profile updates and login checks
//! - `balance_group` - Balance group validation and orchestration
//! - `expense` - Expense validation and orchestration
//! - `balance` - Per-member balance derivation
//! - `access` - Authorization predicates and route guards
//! - `auth` - Roles, account status and password hashing

pub mod access;
pub mod auth;
pub mod balance;
pub mod balance_group;
pub mod expense;
pub mod repository;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use repository::RepositoryError;
