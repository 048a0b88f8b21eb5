//! # Sparky Chatbot
//!
//! The chat window's state machine, independent of how it is rendered.
//!
//! Each submitted line is routed by mode:
//!
//! | State                       | Effect of `submit`                                       |
//! |-----------------------------|----------------------------------------------------------|
//! | training, waiting for pattern  | remember pattern, ask for the response (`Prompt`)     |
//! | training, waiting for response | save the entry, confirm (`Learned`)                   |
//! | live and connected          | send to the server (`Live`), caller arms the timeout    |
//! | otherwise                   | answer locally after a pause (`Local`)                   |
//!
//! Delays are the caller's job; the constants below give the timings.

pub mod replies;
pub mod training;

pub use training::{TrainingBook, TrainingEntry};

use crate::core::error::Result;
use chrono::{DateTime, Utc};
use shared::{ChatMessage, MessageKind, Sender};
use std::time::Duration;
use tracing::{debug, info};

/// Pause before the training prompt appears.
pub const PROMPT_DELAY: Duration = Duration::from_millis(500);
/// Pause before a local reply appears.
pub const LOCAL_REPLY_DELAY: Duration = Duration::from_millis(1500);
/// How long a live message waits for the server before answering locally.
pub const LIVE_REPLY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Local,
    Live,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingStage {
    Pattern,
    Response { pattern: String },
}

/// One line in the chat window.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// What the caller has to do after [`Chatbot::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    /// Blank input, nothing happened.
    Ignored,
    /// Show this with [`Chatbot::show_bot`] after [`PROMPT_DELAY`].
    Prompt(String),
    /// Entry saved; the confirmation is already in the transcript.
    Learned(String),
    /// Send this frame, then call [`Chatbot::live_timeout`] after [`LIVE_REPLY_TIMEOUT`].
    Live(ChatMessage),
    /// Show this with [`Chatbot::show_bot`] after [`LOCAL_REPLY_DELAY`].
    Local(String),
}

pub struct Chatbot {
    messages: Vec<DisplayMessage>,
    thinking: bool,
    mode: Mode,
    connected: bool,
    training: Option<TrainingStage>,
    book: TrainingBook,
}

impl Chatbot {
    /// New conversation seeded with Sparky's greeting.
    pub fn new(book: TrainingBook) -> Self {
        let mut bot = Self {
            messages: Vec::new(),
            thinking: false,
            mode: Mode::Local,
            connected: false,
            training: None,
            book,
        };
        bot.append(Sender::Bot, replies::GREETING.to_string(), Utc::now());
        bot
    }

    // region: --- Accessors

    pub fn messages(&self) -> &[DisplayMessage] {
        &self.messages
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_training(&self) -> bool {
        self.training.is_some()
    }

    pub fn training_stage(&self) -> Option<&TrainingStage> {
        self.training.as_ref()
    }

    pub fn patterns(&self) -> &[TrainingEntry] {
        self.book.entries()
    }

    // endregion: --- Accessors

    /// Handle one line typed by the user.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if a newly taught entry cannot be saved;
    /// the entry stays in memory and training returns to the pattern stage.
    pub fn submit(&mut self, text: &str) -> Result<Turn> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Turn::Ignored);
        }
        self.append(Sender::User, text.to_string(), Utc::now());

        match self.training.take() {
            Some(TrainingStage::Pattern) => {
                debug!(pattern = %text, "[CHATBOT] Training pattern received");
                self.training = Some(TrainingStage::Response {
                    pattern: text.to_string(),
                });
                Ok(Turn::Prompt(replies::training_prompt(text)))
            }
            Some(TrainingStage::Response { pattern }) => {
                self.training = Some(TrainingStage::Pattern);
                self.book.push(TrainingEntry::custom(pattern.as_str(), text));
                info!(pattern = %pattern, patterns = self.book.len(), "[CHATBOT] Learned pattern");

                let confirmation = replies::training_confirmation(&pattern, text);
                self.append(Sender::Bot, confirmation.clone(), Utc::now());
                self.book.save()?;
                Ok(Turn::Learned(confirmation))
            }
            None if self.mode == Mode::Live && self.connected => {
                self.thinking = true;
                Ok(Turn::Live(ChatMessage::chat(Sender::User, text)))
            }
            None => {
                self.thinking = true;
                Ok(Turn::Local(self.local_reply(text)))
            }
        }
    }

    /// Local answer to `text`, trained patterns first.
    pub fn local_reply(&self, text: &str) -> String {
        replies::local_reply(text, &self.book)
    }

    /// Append a bot line and stop thinking.
    pub fn show_bot(&mut self, text: impl Into<String>) -> &DisplayMessage {
        self.thinking = false;
        self.append(Sender::Bot, text.into(), Utc::now())
    }

    /// Handle a frame from the chat socket.
    ///
    /// Only bot chat frames reach the transcript; echoes of the user's own
    /// messages are skipped.
    pub fn receive(&mut self, message: &ChatMessage) -> Option<&DisplayMessage> {
        match message.kind {
            MessageKind::Chat if message.sender == Some(Sender::Bot) => {
                let timestamp = message
                    .timestamp
                    .as_deref()
                    .and_then(|t| lib_utils::parse_utc(t).ok())
                    .unwrap_or_else(Utc::now);
                self.thinking = false;
                Some(self.append(Sender::Bot, message.message.clone(), timestamp))
            }
            MessageKind::Welcome => {
                info!(message = %message.message, "[CHATBOT] Server welcome");
                None
            }
            kind => {
                debug!(kind = kind.as_str(), "[CHATBOT] Frame not shown");
                None
            }
        }
    }

    /// Called when a live message's timeout fires.
    ///
    /// Answers locally if the server never replied.
    pub fn live_timeout(&mut self, user_text: &str) -> Option<&DisplayMessage> {
        if !self.thinking {
            return None;
        }
        info!("[CHATBOT] Live reply timed out, answering locally");
        let reply = format!("{}{}", replies::NO_RESPONSE_PREFIX, self.local_reply(user_text));
        Some(self.show_bot(reply))
    }

    // region: --- Training Controls

    /// Enter or leave training mode. Entering announces itself.
    pub fn toggle_training(&mut self) -> Option<&DisplayMessage> {
        if self.training.take().is_some() {
            info!("[CHATBOT] Training mode off");
            return None;
        }
        info!("[CHATBOT] Training mode on");
        self.training = Some(TrainingStage::Pattern);
        let announcement = replies::pick(&replies::TRAINING_REPLIES);
        Some(self.append(Sender::Bot, announcement.to_string(), Utc::now()))
    }

    /// Delete one trained entry by position and persist.
    pub fn forget(&mut self, index: usize) -> Result<Option<TrainingEntry>> {
        let removed = self.book.remove(index);
        if removed.is_some() {
            self.book.save()?;
        }
        Ok(removed)
    }

    /// Delete every trained entry and persist.
    pub fn clear_training(&mut self) -> Result<usize> {
        let removed = self.book.clear();
        self.book.save()?;
        Ok(removed)
    }

    // endregion: --- Training Controls

    // region: --- Live Mode

    pub fn set_live(&mut self, live: bool) {
        self.mode = if live { Mode::Live } else { Mode::Local };
        info!(mode = ?self.mode, "[CHATBOT] Mode changed");
    }

    /// The chat socket reported an open connection.
    pub fn on_connected(&mut self) -> Option<&DisplayMessage> {
        self.connected = true;
        if self.mode != Mode::Live {
            return None;
        }
        Some(self.append(Sender::Bot, replies::LIVE_CONNECTED_NOTICE.to_string(), Utc::now()))
    }

    /// The chat socket closed. Live mode falls back to local replies.
    pub fn on_disconnected(&mut self) -> Option<&DisplayMessage> {
        self.connected = false;
        if self.mode != Mode::Live {
            return None;
        }
        self.mode = Mode::Local;
        Some(self.append(Sender::Bot, replies::LIVE_DISCONNECTED_NOTICE.to_string(), Utc::now()))
    }

    // endregion: --- Live Mode

    fn append(&mut self, sender: Sender, text: String, timestamp: DateTime<Utc>) -> &DisplayMessage {
        let id = self.messages.len() as u64 + 1;
        self.messages.push(DisplayMessage {
            id,
            text,
            sender,
            timestamp,
        });
        &self.messages[self.messages.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_book() -> (TrainingBook, PathBuf) {
        let path = std::env::temp_dir()
            .join(format!("sparky-{}", uuid::Uuid::new_v4()))
            .join("custom-responses.json");
        (TrainingBook::load(&path), path)
    }

    fn live_bot() -> Chatbot {
        let mut bot = Chatbot::new(TrainingBook::in_memory());
        bot.set_live(true);
        bot.on_connected();
        bot
    }

    #[test]
    fn test_new_conversation_starts_with_greeting() {
        let bot = Chatbot::new(TrainingBook::in_memory());
        assert_eq!(bot.messages().len(), 1);
        assert_eq!(bot.messages()[0].text, replies::GREETING);
        assert_eq!(bot.messages()[0].sender, Sender::Bot);
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut bot = Chatbot::new(TrainingBook::in_memory());
        assert_eq!(bot.submit("   ").unwrap(), Turn::Ignored);
        assert_eq!(bot.messages().len(), 1);
    }

    #[test]
    fn test_local_turn_thinks_until_shown() {
        let mut bot = Chatbot::new(TrainingBook::in_memory());

        let Turn::Local(reply) = bot.submit("how much does it cost?").unwrap() else {
            panic!("expected local turn");
        };

        assert!(bot.is_thinking());
        assert!(replies::PRICING_REPLIES.contains(&reply.as_str()));
        bot.show_bot(reply);
        assert!(!bot.is_thinking());
        assert_eq!(bot.messages().len(), 3);
    }

    #[test]
    fn test_training_flow_teaches_and_persists() {
        // Arrange
        let (book, path) = temp_book();
        let mut bot = Chatbot::new(book);
        let announcement = bot.toggle_training().unwrap().text.clone();
        assert!(replies::TRAINING_REPLIES.contains(&announcement.as_str()));

        // Act
        let prompt = bot.submit("refund").unwrap();
        let learned = bot.submit("Refunds take 5 days.").unwrap();

        // Assert
        assert_eq!(prompt, Turn::Prompt(replies::training_prompt("refund")));
        assert_eq!(
            learned,
            Turn::Learned(replies::training_confirmation("refund", "Refunds take 5 days."))
        );
        assert_eq!(bot.training_stage(), Some(&TrainingStage::Pattern));
        assert_eq!(TrainingBook::load(&path).entries(), bot.patterns());

        bot.toggle_training();
        assert_eq!(
            bot.submit("what is your REFUND policy").unwrap(),
            Turn::Local("Refunds take 5 days.".to_string())
        );
    }

    #[test]
    fn test_leaving_training_drops_pending_pattern() {
        let mut bot = Chatbot::new(TrainingBook::in_memory());
        bot.toggle_training();
        bot.submit("refund").unwrap();

        assert!(bot.toggle_training().is_none());
        assert!(!bot.is_training());
        bot.toggle_training();
        assert_eq!(bot.training_stage(), Some(&TrainingStage::Pattern));
        assert!(bot.patterns().is_empty());
    }

    #[test]
    fn test_forget_and_clear_persist() {
        let (book, path) = temp_book();
        let mut bot = Chatbot::new(book);
        bot.toggle_training();
        for (pattern, response) in [("a", "1"), ("b", "2"), ("c", "3")] {
            bot.submit(pattern).unwrap();
            bot.submit(response).unwrap();
        }

        assert_eq!(bot.forget(0).unwrap().map(|e| e.pattern), Some("a".to_string()));
        assert!(bot.forget(9).unwrap().is_none());
        assert_eq!(TrainingBook::load(&path).len(), 2);

        assert_eq!(bot.clear_training().unwrap(), 2);
        assert!(TrainingBook::load(&path).is_empty());
    }

    #[test]
    fn test_live_turn_and_bot_reply() {
        let mut bot = live_bot();
        assert_eq!(bot.messages().last().unwrap().text, replies::LIVE_CONNECTED_NOTICE);

        let Turn::Live(frame) = bot.submit("hello").unwrap() else {
            panic!("expected live turn");
        };
        assert!(frame.is_chat_from(Sender::User));
        assert_eq!(frame.message, "hello");
        assert!(bot.is_thinking());

        // The server echoes the user's own frame first.
        assert!(bot.receive(&frame).is_none());
        assert!(bot.is_thinking());

        let reply = ChatMessage::chat(Sender::Bot, "Hello! Welcome.");
        assert_eq!(bot.receive(&reply).unwrap().text, "Hello! Welcome.");
        assert!(!bot.is_thinking());
        assert!(bot.live_timeout("hello").is_none());
    }

    #[test]
    fn test_live_timeout_answers_locally() {
        let mut bot = live_bot();
        bot.submit("what services do you provide").unwrap();

        let text = bot.live_timeout("what services do you provide").unwrap().text.clone();

        let local = text.strip_prefix(replies::NO_RESPONSE_PREFIX).unwrap();
        assert!(replies::SERVICES_REPLIES.contains(&local));
        assert!(!bot.is_thinking());
    }

    #[test]
    fn test_live_without_connection_answers_locally() {
        let mut bot = Chatbot::new(TrainingBook::in_memory());
        bot.set_live(true);

        assert!(matches!(bot.submit("hello").unwrap(), Turn::Local(_)));
    }

    #[test]
    fn test_disconnect_drops_back_to_local() {
        let mut bot = live_bot();

        let notice = bot.on_disconnected().unwrap().text.clone();

        assert_eq!(notice, replies::LIVE_DISCONNECTED_NOTICE);
        assert_eq!(bot.mode(), Mode::Local);
        assert!(bot.on_disconnected().is_none());
    }

    #[test]
    fn test_local_mode_connection_events_are_silent() {
        let mut bot = Chatbot::new(TrainingBook::in_memory());
        assert!(bot.on_connected().is_none());
        assert_eq!(bot.messages().len(), 1);
    }
}
