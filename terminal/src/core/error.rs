//! # Common Error Types
//!
//! Consolidated error handling for the chat terminal.
//!
//! ## Error Categories
//!
//! - **Network**: the request never produced an HTTP response (refused, timeout)
//! - **Api**: the backend answered with an unexpected status or body
//! - **Validation**: the backend rejected the contact form, one entry per failing field
//! - **Storage**: the training book could not be read or written
//! - **Socket**: the chat WebSocket could not be used
//!
//! ## Usage Pattern
//!
//! ```rust,no_run
//! use chat_terminal::core::error::{ClientError, Result};
//!
//! fn require_site(url: &str) -> Result<()> {
//!     if url.is_empty() {
//!         return Err(ClientError::Api("Site URL is empty".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use shared::FieldError;
use thiserror::Error;

/// Client-side error type.
///
/// # Example
///
/// ```rust
/// use chat_terminal::core::error::ClientError;
///
/// let err = ClientError::Network("connection refused".to_string());
/// assert_eq!(err.to_string(), "Network error: connection refused");
/// ```
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    /// The server's field errors, in the order it reported them.
    #[error("Validation error: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Socket error: {0}")]
    Socket(String),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| match e.field() {
            Some(field) => format!("{field}: {}", e.message),
            None => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

/// Convenience type alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::FieldErrorCode;

    #[test]
    fn test_validation_display_lists_fields() {
        let err = ClientError::Validation(vec![
            FieldError::new("name", FieldErrorCode::TooSmall, "Name must be at least 2 characters"),
            FieldError::new("email", FieldErrorCode::InvalidString, "Please enter a valid email address"),
        ]);

        assert_eq!(
            err.to_string(),
            "Validation error: name: Name must be at least 2 characters; email: Please enter a valid email address"
        );
    }

    #[test]
    fn test_io_error_is_storage() {
        let err: ClientError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, ClientError::Storage(_)));
    }
}
