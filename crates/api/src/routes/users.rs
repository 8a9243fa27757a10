//! Account routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use kitty_core::auth::{AccountStatus, UserRole};
use kitty_core::user::{RegisterUserInput, UpdateUserInput, User};
use kitty_shared::types::UserId;

use crate::{
    AppState,
    error::ApiResult,
    middleware::{AuthUser, guard},
};

/// Creates the public registration route.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/users", post(register))
}

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new().route("/users/me", get(me)).route(
        "/users/{user_id}",
        get(get_user)
            .put(update_user)
            .delete(delete_user)
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                guard::self_or_admin,
            )),
    )
}

/// Request body for registering an account.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login email.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 8, max = 64))]
    pub password: String,
    /// Display name.
    #[validate(length(max = 128))]
    pub nickname: Option<String>,
}

/// Request body for replacing an account's profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// Login email.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// New plaintext password.
    #[validate(length(min = 8, max = 64))]
    pub password: String,
    /// Display name; omitting it clears the current one.
    #[validate(length(max = 128))]
    pub nickname: Option<String>,
}

/// An account as returned by the API. The password hash is never exposed.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// Account ID.
    pub id: Option<UserId>,
    /// Login email.
    pub email: String,
    /// Display name.
    pub nickname: Option<String>,
    /// Account role.
    pub role: UserRole,
    /// Whether the email has been confirmed.
    pub is_email_verified: bool,
    /// Account status.
    pub account_status: AccountStatus,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Last profile update.
    pub updated_at: Option<DateTime<Utc>>,
    /// Last login.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
            role: user.role,
            is_email_verified: user.is_email_verified,
            account_status: user.account_status,
            created_at: user.created_at,
            updated_at: user.updated_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// POST /users - Register a new account.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    payload.validate()?;

    let user = state
        .users
        .register(RegisterUserInput {
            email: payload.email,
            password: payload.password,
            nickname: payload.nickname,
        })
        .await?;

    info!(user_id = ?user.id, "Registered account");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /users/me - The caller's own account.
async fn me(State(state): State<AppState>, AuthUser(caller): AuthUser) -> ApiResult<Json<UserResponse>> {
    let user = state.users.get_by_id(caller.id).await?;
    Ok(Json(user.into()))
}

/// GET /users/{user_id}
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.users.get_by_id(user_id).await?;
    Ok(Json(user.into()))
}

/// PUT /users/{user_id}
async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    payload.validate()?;

    let user = state
        .users
        .update(
            user_id,
            UpdateUserInput {
                email: payload.email,
                password: payload.password,
                nickname: payload.nickname,
            },
        )
        .await?;

    Ok(Json(user.into()))
}

/// DELETE /users/{user_id} - Remove an account with its groups and expenses.
async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> ApiResult<StatusCode> {
    state.users.delete(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
