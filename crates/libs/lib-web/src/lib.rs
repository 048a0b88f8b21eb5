//! # Web Library
//!
//! HTTP handlers, middleware, the chat relay, and server startup for the site backend.

pub mod chat;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;

pub use server::{create_router, start_server, AppState};
