//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod balance_groups;
pub mod expenses;
pub mod health;
pub mod users;

#[cfg(test)]
mod tests;

/// Creates the API router, public and protected routes together.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Guards run inside the auth layer, so the caller is known when they fire.
    let protected_routes = Router::new()
        .merge(users::routes(&state))
        .merge(balance_groups::routes(&state))
        .merge(expenses::routes(&state))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(users::public_routes())
        .merge(protected_routes)
}
