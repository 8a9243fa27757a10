//! Route guards.
//!
//! Each guard is layered onto a single route method with
//! `route_layer(from_fn_with_state(state, guard))`. It reads the caller placed in
//! the request by [`auth_middleware`](super::auth_middleware), resolves the path
//! ids and rejects the request with 403 before the handler runs.

use std::collections::HashMap;
use std::str::FromStr;

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use kitty_core::access::{CurrentUser, Guard};
use kitty_shared::types::{BalanceGroupId, ExpenseId, UserId};

use crate::{AppState, error::ApiError};

/// Parses a typed id from the matched path parameters.
fn path_id<T: FromStr>(params: &HashMap<String, String>, name: &str) -> Result<T, ApiError> {
    params
        .get(name)
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| ApiError::not_found(format!("Invalid {name} in path")))
}

async fn enforce(
    state: &AppState,
    guard: Result<Guard, ApiError>,
    request: Request,
    next: Next,
) -> Response {
    let guard = match guard {
        Ok(guard) => guard,
        Err(e) => return e.into_response(),
    };
    let caller = request.extensions().get::<CurrentUser>().copied();

    match state.access.authorize(caller.as_ref(), guard).await {
        Ok(()) => next.run(request).await,
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Allows members of `{group_id}` and admins.
pub async fn group_member_or_admin(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    let guard = path_id::<BalanceGroupId>(&params, "group_id").map(Guard::GroupMemberOrAdmin);
    enforce(&state, guard, request, next).await
}

/// Allows the creator of `{group_id}` and admins.
pub async fn group_owner_or_admin(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    let guard = path_id::<BalanceGroupId>(&params, "group_id").map(Guard::GroupOwnerOrAdmin);
    enforce(&state, guard, request, next).await
}

/// Allows the creator of `{expense_id}` and admins.
pub async fn expense_owner_or_admin(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    let guard = path_id::<ExpenseId>(&params, "expense_id").map(Guard::ExpenseOwnerOrAdmin);
    enforce(&state, guard, request, next).await
}

/// Allows the account `{user_id}` itself and admins.
pub async fn self_or_admin(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    let guard = path_id::<UserId>(&params, "user_id").map(Guard::SelfOrAdmin);
    enforce(&state, guard, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_id() {
        let id = UserId::new();
        let params = HashMap::from([("user_id".to_string(), id.to_string())]);

        assert_eq!(path_id::<UserId>(&params, "user_id").unwrap(), id);
        assert!(path_id::<UserId>(&params, "group_id").is_err());

        let params = HashMap::from([("user_id".to_string(), "nope".to_string())]);
        let err = path_id::<UserId>(&params, "user_id").unwrap_err();
        assert_eq!(err.0.status_code(), 404);
    }
}
