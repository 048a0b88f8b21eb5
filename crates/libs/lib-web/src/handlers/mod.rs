//! # HTTP Request Handlers
//!
//! Axum handlers, one module per feature.
//!
//! - **[`contact`]**: `POST /api/contact`: validate, store, notify
//! - **[`websocket`]**: `GET /ws`: chat relay connection
//!
//! Handlers pull what they need out of [`crate::AppState`] through `FromRef`
//! and return `Result<_, AppError>` so failures render as the site's error body.

pub mod contact;
pub mod websocket;
