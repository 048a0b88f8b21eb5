//! # Fallback Responder
//!
//! Canned answers used by [`ChatSocket`](super::chat_socket::ChatSocket) once
//! it gives up on the server. Rules are checked in order against the
//! lowercased text; the first one with a matching keyword answers.

use shared::{ChatMessage, MessageKind, Sender};

/// Reply to any non-chat frame sent while in fallback mode.
pub const STATIC_HOSTING_NOTICE: &str =
    "This feature requires WebSocket support which is not available in static hosting mode.";

pub const DEFAULT_FALLBACK_REPLY: &str = "I'm currently in fallback mode with limited functionality. For more detailed information, please explore our website or contact us directly at info@smartscaleai.ai.";

const RULES: &[(&[&str], &str)] = &[
    (
        &["hello", "hi", "hey"],
        "Hi there! I'm Sparky. I'm in fallback mode right now, but I can still help with basic questions about SmartScale AI.",
    ),
    (
        &["who are you", "what are you"],
        "I'm Sparky, the SmartScale AI assistant. I'm currently running in fallback mode, which means I have limited functionality.",
    ),
    (
        &["services", "what do you do"],
        "SmartScale AI offers services including AI Strategy & Consulting, AI Implementation & Integration, Business Process Automation, Predictive Analytics, and AI Training.",
    ),
    (
        &["contact", "get in touch"],
        "You can contact SmartScale AI at info@smartscaleai.ai or call (386)473-2002. Our address is 3143 Autumnwood Trl, Apopka Florida 32703.",
    ),
    (
        &["website", "web"],
        "You're currently on the SmartScale AI website. Feel free to explore our services, insights, and more information about how we can help your business grow with AI.",
    ),
];

/// Canned answer for a chat message.
pub fn fallback_reply(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, reply)| *reply)
        .unwrap_or(DEFAULT_FALLBACK_REPLY)
}

/// Frame the hook delivers in place of a server response to `outgoing`.
pub fn respond_to(outgoing: &ChatMessage) -> ChatMessage {
    match outgoing.kind {
        MessageKind::Chat => ChatMessage::chat(Sender::Bot, fallback_reply(&outgoing.message)),
        _ => ChatMessage::info(STATIC_HOSTING_NOTICE),
    }
}
