//! # Request/Response Logging Middleware
//!
//! One `[REQUEST]` line when a request arrives, one `[RESPONSE]` line with
//! status and latency when it completes. The response line is logged at
//! `error` for 5xx and `warn` for 4xx.
//!
//! Bodies are never logged here; the contact handler logs its own fields.

use super::mw_req_stamp::RequestStamp;
use axum::http::{HeaderMap, StatusCode};
use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Headers whose values must not reach the logs
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "x-api-key", "x-auth-token"];

pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let request_id = req
        .extensions()
        .get::<RequestStamp>()
        .map(|s| s.id.clone())
        .unwrap_or_else(|| "unknown".to_string());

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        query = ?req.uri().query(),
        client_ip = ?client_ip(req.headers()),
        "[REQUEST] {} {}",
        method,
        path
    );
    debug!(request_id = %request_id, headers = ?redacted_headers(req.headers()), "[REQUEST HEADERS]");

    let response = next.run(req).await;

    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis();
    let line = format!("[RESPONSE] {method} {path} -> {} ({elapsed_ms}ms)", status.as_u16());

    match status_class(status) {
        "server_error" => error!(request_id = %request_id, status = status.as_u16(), elapsed_ms, "{line}"),
        "client_error" => warn!(request_id = %request_id, status = status.as_u16(), elapsed_ms, "{line}"),
        _ => info!(request_id = %request_id, status = status.as_u16(), elapsed_ms, "{line}"),
    }

    response
}

/// First address in `X-Forwarded-For`, else `X-Real-IP`.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .or_else(|| headers.get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn redacted_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            let lower = name.as_str().to_ascii_lowercase();
            if SENSITIVE_HEADERS.iter().any(|h| lower.contains(h)) {
                Some((name.to_string(), "***REDACTED***".to_string()))
            } else {
                value.to_str().ok().map(|v| (name.to_string(), v.to_string()))
            }
        })
        .collect()
}

fn status_class(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        "server_error"
    } else if status.is_client_error() {
        "client_error"
    } else {
        "ok"
    }
}
