//! # Middleware
//!
//! Axum middleware applied to every route.
//!
//! - **[`mw_req_stamp`]**: request ID stamping (`X-Request-ID`)
//! - **[`mw_logging`]**: request/response logging

// region: --- Modules
pub mod mw_logging;
pub mod mw_req_stamp;
// endregion: --- Modules

// region: --- Re-exports
pub use mw_logging::{client_ip, log_requests};
pub use mw_req_stamp::{stamp_req, RequestStamp, REQUEST_ID_HEADER};
// endregion: --- Re-exports
