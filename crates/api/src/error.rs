//! Error responses.
//!
//! Every handler error becomes an [`ApiError`], rendered as
//! `{"status": 404, "error": "NOT_FOUND", "message": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use validator::ValidationErrors;

use kitty_core::access::AccessError;
use kitty_core::balance_group::BalanceGroupError;
use kitty_core::expense::ExpenseError;
use kitty_core::user::UserError;
use kitty_shared::{AppError, JwtError};

/// An error returned from a handler or middleware.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Rejects a request body.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self(AppError::Validation(msg.into()))
    }

    /// Reports a missing resource.
    #[must_use]
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(AppError::NotFound(msg.into()))
    }

    /// Rejects an unauthenticated request.
    #[must_use]
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(msg.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        (
            status,
            Json(json!({
                "status": status.as_u16(),
                "error": self.0.error_code(),
                "message": self.0.public_message(),
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        Self(err.into())
    }
}

impl From<BalanceGroupError> for ApiError {
    fn from(err: BalanceGroupError) -> Self {
        Self(err.into())
    }
}

impl From<ExpenseError> for ApiError {
    fn from(err: ExpenseError) -> Self {
        Self(err.into())
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        Self(err.into())
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => Self::unauthorized("Token has expired"),
            JwtError::DecodingError(_) => Self::unauthorized("Invalid or malformed token"),
            JwtError::EncodingError(msg) => Self(AppError::Internal(msg)),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let reasons: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map_or_else(|| e.code.to_string(), ToString::to_string)
                    })
                    .collect();
                format!("{field}: {}", reasons.join(", "))
            })
            .collect();
        fields.sort();
        Self::validation(format!("Invalid request: {}", fields.join("; ")))
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
