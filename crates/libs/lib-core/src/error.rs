//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] used consistently
//! across all backend modules. It follows the `thiserror` pattern for ergonomic error handling.
//!
//! ## Error Categories
//!
//! 1. **Client Errors** (4xx)
//!    - [`Validation`](AppError::Validation) → 400 Bad Request, with per-field errors
//!    - [`NotFound`](AppError::NotFound) → 404 Not Found
//!
//! 2. **Server Errors** (5xx)
//!    - [`Config`](AppError::Config) → 500 Internal Server Error
//!    - [`Internal`](AppError::Internal) → 500 Internal Server Error
//!
//! ## Response Body
//!
//! Every error renders as the site's [`ErrorBody`]:
//!
//! ```json
//! {"message":"Validation error","errors":[{"path":["email"],"message":"...","code":"invalid_string"}]}
//! {"message":"An error occurred while processing your request. Please try again later."}
//! ```
//!
//! Internal details are logged, never returned to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::dto::{ErrorBody, FieldError, FieldErrorCode};
use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Message returned for every 5xx response.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "An error occurred while processing your request. Please try again later.";

/// Application-wide error type covering all error scenarios.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    ///
    /// **HTTP Status**: 500 Internal Server Error
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more request fields failed validation.
    ///
    /// **HTTP Status**: 400 Bad Request
    #[error("Validation error: {} field(s) rejected", .0.len())]
    Validation(Vec<FieldError>),

    /// Requested resource not found.
    ///
    /// **HTTP Status**: 404 Not Found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error (storage failure, unexpected state).
    ///
    /// **HTTP Status**: 500 Internal Server Error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message.
    ///
    /// For internal errors, returns a generic message to avoid exposing implementation details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(_) => "Validation error".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Config(_) | AppError::Internal(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    fn into_body(self) -> ErrorBody {
        let message = self.user_message();
        let errors = match self {
            AppError::Validation(errors) => Some(errors),
            _ => None,
        };
        ErrorBody { message, errors }
    }
}

/// Implement Axum's `IntoResponse` for automatic error handling.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        (status, Json(self.into_body())).into_response()
    }
}

/// A body that is not JSON becomes a single body-level validation error.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(vec![FieldError::new(
            "",
            FieldErrorCode::InvalidJson,
            format!("Invalid JSON: {}", err),
        )])
    }
}
