//! # Debugging and Tracing Infrastructure
//!
//! File-based logging for the chat terminal. Stdout belongs to the REPL, so
//! every `tracing` event goes to `<CHAT_LOG_DIR>/chat-terminal.log` (daily
//! rotation) instead.
//!
//! ## Configuration
//!
//! - `RUST_LOG`: log filter (e.g., `chat_terminal=debug,info`); defaults to `chat_terminal=info,warn`
//! - `CHAT_LOG_DIR`: log directory (default: `logs`)

pub mod logger;

pub use logger::init as init_logger;
