//! Shared setup for database integration tests.
//!
//! Every test gets its own throwaway `PostgreSQL` container with the schema
//! migrated, so tests never see each other's rows.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;

use kitty_core::auth::{AccountStatus, UserRole};
use kitty_core::user::{User, UserRepository as _};
use kitty_db::migration::Migrator;
use kitty_db::{BalanceGroupRepository, ExpenseRepository, UserRepository};
use kitty_shared::types::UserId;

/// A migrated database and the container backing it.
pub struct TestDb {
    pub db: DatabaseConnection,
    pub users: Arc<UserRepository>,
    pub groups: Arc<BalanceGroupRepository>,
    pub expenses: Arc<ExpenseRepository>,
    _container: ContainerAsync<Postgres>,
}

pub async fn setup() -> TestDb {
    let container = Postgres::default()
        .start()
        .await
        .expect("Failed to start PostgreSQL container");
    let host = container.get_host().await.expect("Failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get port");
    let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");

    let db = Database::connect(&url)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");

    TestDb {
        users: Arc::new(UserRepository::new(db.clone())),
        groups: Arc::new(BalanceGroupRepository::new(db.clone())),
        expenses: Arc::new(ExpenseRepository::new(db.clone())),
        db,
        _container: container,
    }
}

/// Builds an unsaved active account with a random email.
pub fn new_user() -> User {
    User {
        id: None,
        email: SafeEmail().fake(),
        nickname: Some("tester".to_string()),
        password_hash: "$argon2id$test_hash".to_string(),
        role: UserRole::User,
        is_email_verified: false,
        account_status: AccountStatus::Active,
        created_at: Utc::now(),
        updated_at: None,
        last_login_at: None,
        version: 0,
    }
}

/// Inserts an account and returns its id.
pub async fn create_user(test_db: &TestDb) -> UserId {
    test_db
        .users
        .save(new_user())
        .await
        .expect("Failed to create user")
        .id
        .expect("Saved user should have an id")
}
