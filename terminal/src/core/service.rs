//! # Service Traits
//!
//! Traits for dependency injection, so the REPL can be driven against a fake backend.

use crate::core::error::Result;
use async_trait::async_trait;
use shared::{ContactRequest, ContactResponse};

/// Contact form submission.
#[async_trait]
pub trait ContactService: Send + Sync {
    /// Post the form; field errors come back as `ClientError::Validation`.
    async fn submit_contact(&self, request: &ContactRequest) -> Result<ContactResponse>;
}
