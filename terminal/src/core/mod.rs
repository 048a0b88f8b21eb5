//! # Core Abstractions
//!
//! Error types and service traits shared by the rest of the client.
//!
//! - **[`error`]**: `ClientError` and the `Result<T>` alias
//! - **[`service`]**: `ContactService`, the seam the REPL submits the contact form through

pub mod error;
pub mod service;

pub use error::{ClientError, Result};
pub use service::ContactService;
