//! Repository implementations for data access.
//!
//! Each repository implements a persistence port from `kitty-core` on top of
//! `SeaORM`, hiding the entity models from the rest of the application.

pub mod balance_group;
pub mod expense;
pub mod user;

pub use balance_group::BalanceGroupRepository;
pub use expense::ExpenseRepository;
pub use user::UserRepository;

use sea_orm::{DbErr, SqlErr};
use uuid::Uuid;

use kitty_core::RepositoryError;

/// Maps a `SeaORM` error into the port error.
pub(crate) fn db_error(err: DbErr) -> RepositoryError {
    RepositoryError::database(err.to_string())
}

/// Maps a failed insert, reporting unique key violations as conflicts on `id`.
pub(crate) fn insert_error(entity: &'static str, id: Uuid, err: DbErr) -> RepositoryError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => RepositoryError::conflict(entity, id),
        _ => db_error(err),
    }
}
