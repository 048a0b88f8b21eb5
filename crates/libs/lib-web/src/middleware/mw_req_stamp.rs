//! # Request Stamping Middleware
//!
//! Gives every request an ID, stored in request extensions and echoed in the
//! `X-Request-ID` response header. An ID supplied by an upstream proxy is kept.
//!
//! Handlers can read it via `Extension<RequestStamp>`.

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::SystemTime;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request ID we are willing to reuse.
const MAX_UPSTREAM_ID_LEN: usize = 128;

/// Request metadata for tracing and debugging.
#[derive(Clone, Debug)]
pub struct RequestStamp {
    /// Unique request identifier
    pub id: String,
    /// Time the request entered the stack
    pub timestamp: SystemTime,
}

impl RequestStamp {
    fn new(upstream_id: Option<&str>) -> Self {
        let id = upstream_id
            .map(str::trim)
            .filter(|id| !id.is_empty() && id.len() <= MAX_UPSTREAM_ID_LEN)
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Self {
            id,
            timestamp: SystemTime::now(),
        }
    }
}

/// Stamp the request and mirror the ID onto the response.
pub async fn stamp_req(mut req: Request, next: Next) -> Response {
    let upstream_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok());
    let stamp = RequestStamp::new(upstream_id);

    req.extensions_mut().insert(stamp.clone());

    let mut res = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(&stamp.id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    res
}
