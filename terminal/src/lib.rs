//! # SmartScale Chat Terminal - Library Root
//!
//! Terminal stand-in for the site's Sparky chat widget. This library crate
//! holds everything the binary (`main.rs`) drives, so it can be tested without
//! a terminal attached.
//!
//! ## Module Structure
//!
//! - **chatbot**: Sparky's state machine
//!   - local replies, live mode over the chat socket, two-step training
//!   - `training`: the JSON-backed book of taught patterns
//!   - `replies`: canned reply pools and fixed lines
//!
//! - **services**: network clients
//!   - `chat_socket`: reconnecting WebSocket hook for `/ws` with an offline fallback
//!   - `fallback`: the hook's canned responder
//!   - `api`: HTTP client for `POST /api/contact`
//!
//! - **config**: `ClientConfig` read from the environment
//! - **core**: `ClientError` and service traits
//! - **debug**: file logging and the panic hook
//!
//! ```text
//! main.rs (REPL)
//!   ├── chatbot::Chatbot ──── chatbot::training::TrainingBook ──► custom-responses.json
//!   ├── services::ChatSocket ─────── ws://<site>/ws
//!   └── services::api::ApiClient ─── POST <site>/api/contact
//! ```
//!
//! ## Event Flow
//!
//! The REPL owns the chatbot and selects over three sources: stdin lines,
//! [`services::SocketEvent`]s from the socket task, and delayed bot lines
//! scheduled by the REPL itself. All of them arrive on async channels, so the
//! chatbot is only ever touched from one task.

pub mod chatbot;
pub mod config;
pub mod core;
pub mod debug;
pub mod services;

pub use chatbot::{Chatbot, Turn};
pub use config::ClientConfig;
pub use crate::core::{ClientError, Result};
