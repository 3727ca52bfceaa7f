use axum::{
    extract::rejection::BytesRejection,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::account::AccountError;

/// Message returned when the account client rejects the session.
pub const UNAUTHORIZED_MESSAGE: &str =
    "Session string is invalid or expired. Please ensure API ID/Hash match and the session is active.";

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A validation error, raised before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request body could not be read.
    #[error("Request body rejected: {0}")]
    Body(#[from] BytesRejection),

    /// The account client reported the session as not authorized.
    #[error("Session is not authorized")]
    SessionUnauthorized,

    /// Any other failure reported by the account client.
    #[error("Account client error: {0}")]
    Account(#[from] AccountError),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Status code and client-facing message for this error.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Body(rejection) => (rejection.status(), rejection.body_text()),
            AppError::SessionUnauthorized => {
                (StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE.to_string())
            }
            AppError::Account(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("An unexpected error occurred: {}", e),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

/// Renders the `{success: false, message}` envelope.
pub fn failure_body(message: &str) -> String {
    sonic_rs::to_string(&sonic_rs::json!({
        "success": false,
        "message": message
    }))
    .unwrap_or_else(|_| r#"{"success":false,"message":"Internal server error"}"#.to_string())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(ref msg) => tracing::debug!("Validation error: {}", msg),
            AppError::Body(ref e) => tracing::debug!("Body rejected: {}", e),
            AppError::SessionUnauthorized => tracing::warn!("Session not authorized"),
            AppError::Account(ref e) => tracing::error!("Account client error: {}", e),
            AppError::Internal(ref msg) => tracing::error!("Internal error: {}", msg),
        }

        let (status, message) = self.status_and_message();

        (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            failure_body(&message),
        )
            .into_response()
    }
}
