//! Chat transcript entries and the chat endpoint wire format.

use serde::{Deserialize, Serialize};

/// Bot text appended when the staff endpoint answers without a reply.
pub const NO_REPLY_TEXT: &str = "No reply from AI.";

/// Bot text appended when a staff chat request fails.
pub const FALLBACK_REPLY_TEXT: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One transcript entry. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { sender: Sender::User, text: text.into(), sources: None }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { sender: Sender::Bot, text: text.into(), sources: None }
    }

    pub fn bot_with_sources(text: impl Into<String>, sources: Option<Vec<String>>) -> Self {
        Self { sender: Sender::Bot, text: text.into(), sources }
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Body POSTed to both chat endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Generic chat endpoint response. A success without `reply` still yields
/// one (empty) bot message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

impl ChatReply {
    pub fn text(&self) -> &str {
        self.reply.as_deref().unwrap_or_default()
    }

    pub fn into_message(self) -> ChatMessage {
        ChatMessage::bot_with_sources(self.reply.unwrap_or_default(), self.sources)
    }
}

/// Staff assistant endpoint response. Only `reply` is consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffReply {
    #[serde(default)]
    pub reply: Option<String>,
}

impl StaffReply {
    /// Reply text, falling back to [`NO_REPLY_TEXT`] when absent or empty.
    pub fn text(&self) -> &str {
        match self.reply.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => NO_REPLY_TEXT,
        }
    }
}
