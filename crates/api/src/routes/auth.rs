//! Login.

use axum::{Json, Router, extract::State, routing::post};
use tracing::info;

use kitty_shared::AppError;
use kitty_shared::auth::{LoginRequest, LoginResponse};

use crate::{AppState, error::ApiResult};

/// Creates the login route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// POST /login - Exchange credentials for a bearer token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .users
        .authenticate(&payload.email, &payload.password)
        .await?;
    let user_id = user
        .id
        .ok_or_else(|| AppError::Internal("Stored account has no id".to_string()))?;

    let access_token = state
        .jwt_service
        .generate_access_token(user_id.into(), user.role.as_str())?;

    info!(user_id = %user_id, role = %user.role, "User logged in");

    Ok(Json(LoginResponse::bearer(
        access_token,
        state.jwt_service.access_token_expires_in(),
    )))
}
