//! # Data Transfer Objects (DTOs)
//!
//! Data structures exchanged between the site backend and its clients.
//!
//! ## Module Organization
//!
//! - [`contact`] - Contact form submission (`POST /api/contact`)
//! - [`chat`] - Chat frames exchanged over `GET /ws`
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /api/contact
//! Content-Type: application/json
//!
//! {
//!   "name": "Ada Lovelace",
//!   "email": "ada@example.com",
//!   "message": "We would like to automate our invoicing."
//! }
//! ```
//!
//! ```text
//! HTTP/1.1 201 Created
//! Content-Type: application/json
//!
//! {
//!   "message": "Thank you for your message! We'll get back to you soon.",
//!   "id": 1
//! }
//! ```

pub mod chat;
pub mod contact;

pub use chat::*;
pub use contact::*;
