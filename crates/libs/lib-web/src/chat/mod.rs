//! # Chat Module
//!
//! Real-time chat over the `/ws` WebSocket endpoint.
//!
//! - [`relay`]: the broadcast hub and frame dispatch
//! - [`bot`]: canned, keyword-matched bot replies

pub mod bot;
pub mod relay;

pub use relay::{ChatRelay, WELCOME_MESSAGE};
