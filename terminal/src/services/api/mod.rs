//! # Backend API Client Module
//!
//! HTTP calls to the site backend.
//!
//! ```text
//! api/
//! ├── mod.rs      - Module exports
//! ├── client.rs   - ApiClient struct and common functionality
//! └── contact.rs  - POST /api/contact
//! ```

pub mod client;
pub mod contact;

pub use client::ApiClient;
pub use contact::submit_contact;
