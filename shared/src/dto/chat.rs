//! # Chat Envelope
//!
//! The JSON frame exchanged over the `/ws` WebSocket.
//!
//! ```text
//! client -> server   {"type":"chat","sender":"user","message":"hello","timestamp":"2024-05-01T12:00:00.000Z"}
//! server -> clients  {"type":"chat","sender":"bot","message":"Hello! Welcome to ...","timestamp":"..."}
//! server -> client   {"type":"welcome","message":"Connected to SmartScale AI WebSocket server"}
//! server -> client   {"type":"error","message":"Unknown message type","originalData":{...}}
//! ```

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frame kind, carried in the `type` field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Chat,
    Welcome,
    Notification,
    Error,
    /// Produced locally by the fallback responder for non-chat frames; never sent by the server.
    Info,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Chat => "chat",
            MessageKind::Welcome => "welcome",
            MessageKind::Notification => "notification",
            MessageKind::Error => "error",
            MessageKind::Info => "info",
        }
    }
}

/// Author of a chat frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single chat frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Sender>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(rename = "originalData", default, skip_serializing_if = "Option::is_none")]
    pub original_data: Option<Value>,
}

impl ChatMessage {
    fn bare(kind: MessageKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            sender: None,
            message: message.into(),
            timestamp: None,
            data: None,
            original_data: None,
        }
    }

    /// Chat frame stamped with the current time.
    pub fn chat(sender: Sender, message: impl Into<String>) -> Self {
        Self {
            sender: Some(sender),
            timestamp: Some(timestamp_now()),
            ..Self::bare(MessageKind::Chat, message)
        }
    }

    pub fn welcome(message: impl Into<String>) -> Self {
        Self::bare(MessageKind::Welcome, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::bare(MessageKind::Error, message)
    }

    /// Error frame that echoes the offending frame back in `originalData`.
    pub fn error_with_original(message: impl Into<String>, original: Value) -> Self {
        Self {
            original_data: Some(original),
            ..Self::bare(MessageKind::Error, message)
        }
    }

    /// Acknowledgement for a notification frame, echoing it in `data`.
    pub fn notification_ack(message: impl Into<String>, data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::bare(MessageKind::Notification, message)
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            timestamp: Some(timestamp_now()),
            ..Self::bare(MessageKind::Info, message)
        }
    }

    pub fn is_chat_from(&self, sender: Sender) -> bool {
        self.kind == MessageKind::Chat && self.sender == Some(sender)
    }
}

/// Current UTC time as an ISO-8601 string with millisecond precision.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
