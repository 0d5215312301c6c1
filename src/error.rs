//! Error types and Axum response conversions.

use crate::validate::ValidationErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application error types.
///
/// Validation and uniqueness failures happen before any mutation.
/// `AutoLoginFailed` is the one variant raised after an irreversible
/// mutation: the user record has been created, but the follow-up session
/// issuance did not succeed. The record deliberately stays persisted.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input")]
    Validation(ValidationErrors),

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    Credentials,

    #[error("Account created but automatic sign-in failed")]
    AutoLoginFailed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                let body = Json(json!({
                    "error": "Invalid input",
                    "fields": errors,
                }));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            AppError::DuplicateEmail => {
                error_body(StatusCode::CONFLICT, "Email is already registered")
            }
            AppError::Credentials => {
                error_body(StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            AppError::AutoLoginFailed => error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Account created but automatic sign-in failed; please log in",
            ),
            AppError::Internal(msg) => {
                // Log detailed error server-side, return generic message to client
                tracing::error!(error = %msg, "Internal server error");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

// Convenience conversions from common error types
impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Internal(format!("Redis error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}
