//! # Services Module
//!
//! Network-facing pieces of the chat terminal.
//!
//! ```text
//! services/
//! ├── api/           - HTTP client for the contact form
//! ├── chat_socket.rs - Reconnecting WebSocket client for /ws
//! └── fallback.rs    - Canned replies once the socket gives up
//! ```

pub mod api;
pub mod chat_socket;
pub mod fallback;

pub use chat_socket::{ChatSocket, SocketEvent, SocketOptions};
