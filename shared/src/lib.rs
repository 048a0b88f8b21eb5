//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the chat terminal and the site backend.
//! All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::contact`]**: Contact form request, response and field errors
//!   - **[`dto::chat`]**: The WebSocket chat envelope
//! - **[`intent`]**: Keyword classifier used by both the server bot and the local chatbot
//!
//! ## Wire Format
//!
//! - Contact DTOs use the field names the site's contact form posts (`name`, `email`, ...)
//! - The chat envelope carries its kind in a `type` field and omits absent optional fields
//!
//! ## Usage
//!
//! ```rust
//! use shared::{ChatMessage, Sender};
//!
//! let frame = ChatMessage::chat(Sender::User, "hello");
//! let json = serde_json::to_string(&frame).unwrap();
//! assert!(json.contains(r#""type":"chat""#));
//! ```

pub mod dto;
pub mod intent;

pub use dto::*;
pub use intent::{classify, Intent};
