//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for accounts, balance groups and expenses
//! - Authentication and access guard middleware
//! - Error responses

pub mod error;
pub mod middleware;
pub mod notification;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use kitty_core::access::AuthorizationPredicates;
use kitty_core::auth::Argon2PasswordEncoder;
use kitty_core::balance::BalanceCalculator;
use kitty_core::balance_group::BalanceGroupService;
use kitty_core::expense::ExpenseService;
use kitty_core::user::UserService;
use kitty_db::{BalanceGroupRepository, ExpenseRepository, UserRepository};
use kitty_shared::JwtService;

pub use error::ApiError;
pub use notification::VerificationMailer;

/// Account service wired to the database.
pub type AppUserService = UserService<UserRepository, Argon2PasswordEncoder, VerificationMailer>;
/// Balance group service wired to the database.
pub type AppBalanceGroupService =
    BalanceGroupService<UserRepository, BalanceGroupRepository, ExpenseRepository>;
/// Expense service wired to the database.
pub type AppExpenseService =
    ExpenseService<UserRepository, BalanceGroupRepository, ExpenseRepository>;
/// Balance calculator wired to the database.
pub type AppBalanceCalculator = BalanceCalculator<BalanceGroupRepository, ExpenseRepository>;
/// Authorization predicates wired to the database.
pub type AppAuthorization = AuthorizationPredicates<BalanceGroupRepository, ExpenseRepository>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Account management.
    pub users: Arc<AppUserService>,
    /// Balance group management.
    pub balance_groups: Arc<AppBalanceGroupService>,
    /// Expense management.
    pub expenses: Arc<AppExpenseService>,
    /// Per-member balances.
    pub balances: Arc<AppBalanceCalculator>,
    /// Route guards.
    pub access: Arc<AppAuthorization>,
}

impl AppState {
    /// Wires every service to one database connection.
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt_service: JwtService, mailer: VerificationMailer) -> Self {
        let users = Arc::new(UserRepository::new(db.clone()));
        let groups = Arc::new(BalanceGroupRepository::new(db.clone()));
        let expenses = Arc::new(ExpenseRepository::new(db));

        Self {
            jwt_service: Arc::new(jwt_service),
            users: Arc::new(UserService::new(
                users.clone(),
                Arc::new(Argon2PasswordEncoder),
                Arc::new(mailer),
            )),
            balance_groups: Arc::new(BalanceGroupService::new(
                users.clone(),
                groups.clone(),
                expenses.clone(),
            )),
            expenses: Arc::new(ExpenseService::new(users, groups.clone(), expenses.clone())),
            balances: Arc::new(BalanceCalculator::new(groups.clone(), expenses.clone())),
            access: Arc::new(AuthorizationPredicates::new(groups, expenses)),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
