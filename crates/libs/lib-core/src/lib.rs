//! # Core Library
//!
//! Core models, contact storage, configuration, and error handling for the site backend.

pub mod config;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use model::store::{ContactStore, MemContactStore};
pub use model::store::models::{ContactSubmission, NewContact};
