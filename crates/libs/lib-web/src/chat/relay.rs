//! # Chat Relay
//!
//! One global room. Every open `/ws` connection subscribes to a single
//! broadcast channel of serialized frames; a chat frame from any connection is
//! relayed to all of them, the sender included.
//!
//! Frame dispatch:
//!
//! | Incoming                          | Effect                                               |
//! |-----------------------------------|------------------------------------------------------|
//! | `chat` with string `message`      | broadcast raw text, bot reply later if from `user`   |
//! | `notification`                    | ack to sender only                                   |
//! | any other / missing `type`        | `Unknown message type` error to sender only          |
//! | not JSON, or chat without message | `Error processing your message` to sender only       |

use super::bot;
use serde_json::Value;
use shared::{ChatMessage, Sender};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Sent to each connection right after the upgrade.
pub const WELCOME_MESSAGE: &str = "Connected to SmartScale AI WebSocket server";

const BROADCAST_CAPACITY: usize = 256;

/// Shared broadcast hub for the `/ws` endpoint.
#[derive(Debug)]
pub struct ChatRelay {
    tx: broadcast::Sender<String>,
    bot_reply_delay: Duration,
}

impl ChatRelay {
    pub fn new(bot_reply_delay: Duration) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { tx, bot_reply_delay }
    }

    /// Register a new connection for room traffic.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Number of connections currently subscribed.
    pub fn connection_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Send a serialized frame to every subscribed connection.
    pub fn broadcast(&self, frame: String) {
        match self.tx.send(frame) {
            Ok(receivers) => debug!(receivers, "[WS] BROADCAST"),
            Err(_) => debug!("[WS] BROADCAST dropped, no open connections"),
        }
    }

    /// Process one text frame from `client_id`.
    ///
    /// Returns the frame to send back to that connection only, if any.
    /// Broadcasts and the delayed bot reply are handled here.
    pub fn handle_text(&self, client_id: &str, text: &str) -> Option<ChatMessage> {
        let frame: Value = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(client_id = %client_id, error = %e, "[WS] INVALID_JSON client_id={}", client_id);
                return Some(ChatMessage::error("Error processing your message"));
            }
        };

        match frame.get("type").and_then(Value::as_str) {
            Some("chat") => {
                let Some(message) = frame.get("message").and_then(Value::as_str) else {
                    warn!(client_id = %client_id, "[WS] CHAT_WITHOUT_MESSAGE client_id={}", client_id);
                    return Some(ChatMessage::error("Error processing your message"));
                };

                info!(
                    client_id = %client_id,
                    sender = ?frame.get("sender"),
                    "[WS] CHAT client_id={}",
                    client_id
                );
                self.broadcast(text.to_string());

                if frame.get("sender").and_then(Value::as_str) == Some("user") {
                    self.schedule_bot_reply(message.to_string());
                }
                None
            }
            Some("notification") => {
                info!(client_id = %client_id, "[WS] NOTIFICATION client_id={}", client_id);
                Some(ChatMessage::notification_ack("Notification received", frame))
            }
            other => {
                warn!(
                    client_id = %client_id,
                    message_type = ?other,
                    "[WS] UNKNOWN_TYPE client_id={} type={:?}",
                    client_id,
                    other
                );
                Some(ChatMessage::error_with_original("Unknown message type", frame))
            }
        }
    }

    fn schedule_bot_reply(&self, user_message: String) {
        let tx = self.tx.clone();
        let delay = self.bot_reply_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let reply = ChatMessage::chat(Sender::Bot, bot::reply_to(&user_message));
            match serde_json::to_string(&reply) {
                Ok(json) => {
                    // No receivers just means everyone left during the delay.
                    let _ = tx.send(json);
                }
                Err(e) => error!(error = %e, "[WS] SERIALIZE_ERROR bot reply"),
            }
        });
    }
}
