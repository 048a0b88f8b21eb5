//! # Contact Handler
//!
//! `POST /api/contact` accepts the site's contact form.
//!
//! ## Rules
//!
//! | Field     | Rule                                   | Code             |
//! |-----------|----------------------------------------|------------------|
//! | `name`    | required, at least 2 characters        | `too_small`      |
//! | `email`   | required, valid address                | `invalid_string` |
//! | `message` | required, at least 10 characters       | `too_small`      |
//! | `company` | optional                               |                  |
//! | `phone`   | optional                               |                  |
//!
//! Values are checked as sent. Blank optional fields are stored as `None`.
//! A missing required field, or a field
//! of the wrong JSON type, is reported as `invalid_type`. All failures are
//! collected and returned together; the store is only touched once every
//! field passes.

use crate::services::contact_mail;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    Json,
};
use lib_core::{AppError, Config, ContactStore, NewContact};
use lib_utils::{validate_email, validate_min_length};
use serde_json::{Map, Value};
use shared::dto::{ContactResponse, FieldError, FieldErrorCode};
use std::sync::Arc;
use tracing::{error, info, warn};

const NAME_MIN: usize = 2;
const MESSAGE_MIN: usize = 10;

pub const THANK_YOU_MESSAGE: &str = "Thank you for your message! We'll get back to you soon.";

/// Contact form submission.
///
/// # Returns
///
/// * `201` with `{"message", "id"}` once stored
/// * `400` with `{"message":"Validation error","errors":[...]}` on bad input
/// * `500` with a generic message if the store fails
pub async fn submit_contact(
    State(store): State<Arc<dyn ContactStore>>,
    State(config): State<Config>,
    body: Bytes,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    info!(size = body.len(), "[CONTACT] NEW SUBMISSION");

    let payload: Value = serde_json::from_slice(&body).inspect_err(|e| {
        warn!(error = %e, "[CONTACT] Body is not valid JSON");
    })?;

    let new = validate_contact(&payload).map_err(|errors| {
        warn!(
            fields = ?errors.iter().filter_map(FieldError::field).collect::<Vec<_>>(),
            "[CONTACT] Validation failed"
        );
        AppError::Validation(errors)
    })?;

    let submission = store.create(new).await.map_err(|e| {
        error!(error = %e, "[CONTACT] Failed to store submission");
        AppError::Internal(e.to_string())
    })?;

    contact_mail::notify_new_contact(&config.contact_inbox, &submission);

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            message: THANK_YOU_MESSAGE.to_string(),
            id: submission.id,
        }),
    ))
}

// region: --- Validation

/// Check a decoded contact payload, collecting every field error.
pub fn validate_contact(payload: &Value) -> Result<NewContact, Vec<FieldError>> {
    let Some(fields) = payload.as_object() else {
        return Err(vec![FieldError::new(
            "",
            FieldErrorCode::InvalidType,
            format!("Expected object, received {}", json_kind(payload)),
        )]);
    };

    let mut errors = Vec::new();

    let name = required_text(fields, "name", &mut errors);
    if let Some(name) = name {
        if let Err(msg) = validate_min_length(name, NAME_MIN, "Name") {
            errors.push(FieldError::new("name", FieldErrorCode::TooSmall, msg));
        }
    }

    let email = required_text(fields, "email", &mut errors);
    if let Some(email) = email {
        if let Err(msg) = validate_email(email) {
            errors.push(FieldError::new("email", FieldErrorCode::InvalidString, msg));
        }
    }

    let message = required_text(fields, "message", &mut errors);
    if let Some(message) = message {
        if let Err(msg) = validate_min_length(message, MESSAGE_MIN, "Message") {
            errors.push(FieldError::new("message", FieldErrorCode::TooSmall, msg));
        }
    }

    let company = optional_text(fields, "company", &mut errors);
    let phone = optional_text(fields, "phone", &mut errors);

    match (name, email, message) {
        (Some(name), Some(email), Some(message)) if errors.is_empty() => {
            Ok(NewContact::new(name, email, company, phone, message))
        }
        _ => Err(errors),
    }
}

fn required_text<'a>(
    fields: &'a Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<&'a str> {
    match fields.get(field) {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(field, FieldErrorCode::InvalidType, "Required"));
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            errors.push(wrong_type(field, other));
            None
        }
    }
}

fn optional_text(
    fields: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match fields.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.push(wrong_type(field, other));
            None
        }
    }
}

fn wrong_type(field: &str, value: &Value) -> FieldError {
    FieldError::new(
        field,
        FieldErrorCode::InvalidType,
        format!("Expected string, received {}", json_kind(value)),
    )
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// endregion: --- Validation

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{create_router, AppState};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use lib_core::{ContactSubmission, MemContactStore};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    /// Store that counts `create` calls.
    #[derive(Default)]
    struct CountingStore {
        inner: MemContactStore,
        creates: AtomicUsize,
    }

    #[async_trait]
    impl ContactStore for CountingStore {
        async fn create(&self, new: NewContact) -> lib_core::Result<ContactSubmission> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.inner.create(new).await
        }

        async fn list(&self) -> lib_core::Result<Vec<ContactSubmission>> {
            self.inner.list().await
        }

        async fn get(&self, id: i64) -> lib_core::Result<Option<ContactSubmission>> {
            self.inner.get(id).await
        }
    }

    /// Store whose writes always fail.
    struct BrokenStore;

    #[async_trait]
    impl ContactStore for BrokenStore {
        async fn create(&self, _new: NewContact) -> lib_core::Result<ContactSubmission> {
            Err(AppError::Internal("disk on fire".to_string()))
        }

        async fn list(&self) -> lib_core::Result<Vec<ContactSubmission>> {
            Ok(Vec::new())
        }

        async fn get(&self, _id: i64) -> lib_core::Result<Option<ContactSubmission>> {
            Ok(None)
        }
    }

    fn test_app(store: Arc<dyn ContactStore>) -> Router {
        create_router(AppState::new(Config::default(), store))
    }

    async fn post_contact(app: Router, body: impl Into<String>) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/contact")
                    .header("content-type", "application/json")
                    .body(Body::from(body.into()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn valid_body() -> Value {
        json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "company": "Analytical Engines Ltd",
            "message": "We would like to automate our invoicing."
        })
    }

    #[tokio::test]
    async fn test_submit_contact_success() {
        // Arrange
        let store = Arc::new(CountingStore::default());
        let app = test_app(store.clone());

        // Act
        let (status, body) = post_contact(app, valid_body().to_string()).await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], THANK_YOU_MESSAGE);
        assert_eq!(body["id"], 1);

        let stored = store.get(1).await.unwrap().unwrap();
        assert_eq!(stored.name, "Ada Lovelace");
        assert_eq!(stored.company.as_deref(), Some("Analytical Engines Ltd"));
        assert_eq!(stored.phone, None);
    }

    #[tokio::test]
    async fn test_ids_increase_across_submissions() {
        let store = Arc::new(CountingStore::default());
        let app = test_app(store.clone());

        let (_, first) = post_contact(app.clone(), valid_body().to_string()).await;
        let (_, second) = post_contact(app, valid_body().to_string()).await;

        assert_eq!(first["id"], 1);
        assert_eq!(second["id"], 2);
        assert_eq!(store.creates.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_submission_never_reaches_store() {
        // Arrange
        let store = Arc::new(CountingStore::default());
        let app = test_app(store.clone());
        let body = json!({"name": "A", "email": "nope", "message": "short"});

        // Act
        let (status, body) = post_contact(app, body.to_string()).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation error");

        let errors = body["errors"].as_array().unwrap();
        let paths: Vec<&str> = errors
            .iter()
            .map(|e| e["path"][0].as_str().unwrap())
            .collect();
        assert_eq!(paths, ["name", "email", "message"]);
        assert_eq!(errors[0]["message"], "Name must be at least 2 characters");
        assert_eq!(errors[1]["code"], "invalid_string");
        assert_eq!(errors[2]["message"], "Message must be at least 10 characters");

        assert_eq!(store.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_fields_are_required() {
        let store = Arc::new(CountingStore::default());
        let (status, body) = post_contact(test_app(store), "{}").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .all(|e| e["code"] == "invalid_type" && e["message"] == "Required"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let store = Arc::new(CountingStore::default());
        let (status, body) = post_contact(test_app(store.clone()), "{\"name\": ").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "invalid_json");
        assert_eq!(store.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_generic_500() {
        let (status, body) = post_contact(test_app(Arc::new(BrokenStore)), valid_body().to_string()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"message": "An error occurred while processing your request. Please try again later."})
        );
    }

    #[test]
    fn test_validate_keeps_values_and_drops_blank_optionals() {
        let payload = json!({
            "name": "  Zoë ",
            "email": "zoe@example.org",
            "company": "   ",
            "phone": "",
            "message": "  Ten chars!  "
        });

        let new = validate_contact(&payload).unwrap();

        assert_eq!(new.name, "  Zoë ");
        assert_eq!(new.email, "zoe@example.org");
        assert_eq!(new.company, None);
        assert_eq!(new.phone, None);
        assert_eq!(new.message, "  Ten chars!  ");
    }

    #[test]
    fn test_validate_counts_surrounding_whitespace() {
        // Arrange
        let payload = json!({
            "name": "A ",
            "email": "a@example.com",
            "message": "123456789 "
        });

        // Act
        let new = validate_contact(&payload).unwrap();

        // Assert
        assert_eq!(new.name, "A ");
        assert_eq!(new.message, "123456789 ");
    }

    #[test]
    fn test_validate_rejects_padded_email() {
        let payload = json!({
            "name": "Ada",
            "email": " ada@example.com ",
            "message": "Long enough message"
        });

        let errors = validate_contact(&payload).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), Some("email"));
    }

    #[test]
    fn test_validate_reports_wrong_types() {
        let payload = json!({
            "name": 42,
            "email": "ada@example.com",
            "message": "Long enough message",
            "phone": ["555"]
        });

        let errors = validate_contact(&payload).unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field(), Some("name"));
        assert_eq!(errors[0].message, "Expected string, received number");
        assert_eq!(errors[1].field(), Some("phone"));
    }

    #[test]
    fn test_validate_rejects_non_object() {
        let errors = validate_contact(&json!(["name"])).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].path.is_empty());
    }
}
