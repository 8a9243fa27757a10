//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use kitty_core::access::CurrentUser;
use kitty_core::auth::UserRole;
use kitty_shared::Claims;

use crate::{AppState, error::ApiError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Resolves the caller identity carried by validated claims.
fn current_user(claims: &Claims) -> Option<CurrentUser> {
    let role = UserRole::parse(&claims.role)?;
    Some(CurrentUser::new(claims.user_id().into(), role))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Stores the resolved [`CurrentUser`] in request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return ApiError::unauthorized("Authorization header with Bearer token is required")
            .into_response();
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => return ApiError::from(e).into_response(),
    };

    let Some(user) = current_user(&claims) else {
        return ApiError::unauthorized("Invalid or malformed token").into_response();
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Extractor for the authenticated caller.
///
/// ```ignore
/// async fn handler(AuthUser(caller): AuthUser) -> impl IntoResponse {
///     let user_id = caller.id;
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_current_user_from_claims() {
        let id = Uuid::now_v7();
        let expires = Utc::now() + Duration::minutes(5);

        let user = current_user(&Claims::new(id, "admin", expires)).unwrap();
        assert_eq!(user.id, id.into());
        assert_eq!(user.role, UserRole::Admin);

        assert!(current_user(&Claims::new(id, "owner", expires)).is_none());
    }
}
