//! # Contact Data Transfer Objects
//!
//! Request and response structures for `POST /api/contact`.
//!
//! Every request field is optional at the wire level so a missing field is
//! reported as a [`FieldError`] instead of a deserialization failure.

use serde::{Deserialize, Serialize};

/// Contact form payload as posted by the site.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Ada Lovelace",
///   "email": "ada@example.com",
///   "company": "Analytical Engines Ltd",
///   "phone": "+44 20 7946 0000",
///   "message": "We would like to automate our invoicing."
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Returned with `201 Created` once a submission is stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactResponse {
    pub message: String,
    pub id: i64,
}

/// Machine-readable reason attached to a [`FieldError`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    /// Required field is missing or not a string
    InvalidType,
    /// Value is shorter than the minimum length
    TooSmall,
    /// Value does not match the expected format (email)
    InvalidString,
    /// Request body is not valid JSON
    InvalidJson,
}

/// One failed validation rule.
///
/// `path` names the offending field; it is empty for body-level errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub path: Vec<String>,
    pub message: String,
    pub code: FieldErrorCode,
}

impl FieldError {
    pub fn new(field: &str, code: FieldErrorCode, message: impl Into<String>) -> Self {
        let path = if field.is_empty() {
            Vec::new()
        } else {
            vec![field.to_string()]
        };
        Self {
            path,
            message: message.into(),
            code,
        }
    }

    /// Name of the field this error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }
}

/// Error body for 4xx/5xx responses.
///
/// `errors` is present only for validation failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}
