//! # Contact Endpoint
//!
//! `POST /api/contact`.

use super::client::ApiClient;
use crate::core::error::{ClientError, Result};
use reqwest::StatusCode;
use shared::{ContactRequest, ContactResponse, ErrorBody};

/// Submit the contact form.
///
/// A 400 carrying field errors becomes [`ClientError::Validation`]; any other
/// non-success status becomes [`ClientError::Api`] with the server's message.
#[tracing::instrument(skip(client, request), fields(email = ?request.email))]
pub async fn submit_contact(client: &ApiClient, request: &ContactRequest) -> Result<ContactResponse> {
    tracing::info!("[CONTACT] Submitting contact form");
    let start = std::time::Instant::now();

    let response = client
        .client
        .post(client.url("/api/contact"))
        .json(request)
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "[CONTACT] Network error");
            ClientError::Network(e.to_string())
        })?;

    let status = response.status();
    let duration = start.elapsed();

    if status.is_success() {
        let body = response.json::<ContactResponse>().await.map_err(|e| {
            tracing::error!(error = %e, "[CONTACT] Response parse error");
            ClientError::Api(format!("Failed to parse response: {}", e))
        })?;
        tracing::info!(id = body.id, duration_ms = duration.as_millis(), "[CONTACT] Submitted");
        return Ok(body);
    }

    let error = response
        .json::<ErrorBody>()
        .await
        .map_err(|e| ClientError::Api(format!("HTTP {}: failed to parse error: {}", status.as_u16(), e)))?;

    tracing::warn!(
        status = status.as_u16(),
        message = %error.message,
        duration_ms = duration.as_millis(),
        "[CONTACT] Rejected"
    );

    match (status, error.errors) {
        (StatusCode::BAD_REQUEST, Some(errors)) => Err(ClientError::Validation(errors)),
        _ => Err(ClientError::Api(error.message)),
    }
}
