//! # API Client
//!
//! HTTP client for the site backend.

use crate::core::error::Result;
use crate::core::service::ContactService;
use reqwest::Client;
use shared::{ContactRequest, ContactResponse};
use std::time::Duration;

/// HTTP client for the site backend.
///
/// Holds one `reqwest::Client`, so clones share its connection pool.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` (for example `http://localhost:5000`).
    ///
    /// Requests time out after 10 seconds.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl ContactService for ApiClient {
    async fn submit_contact(&self, request: &ContactRequest) -> Result<ContactResponse> {
        super::contact::submit_contact(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new("http://localhost:5000/");
        assert_eq!(client.url("/api/contact"), "http://localhost:5000/api/contact");
    }
}
