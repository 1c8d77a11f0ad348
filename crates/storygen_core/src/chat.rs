//! Chat transcript messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who wrote a chat message.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    /// The person using the tool
    User,
    /// The assistant model
    Model,
}

/// Chat message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One entry in the chat transcript.
///
/// # Examples
///
/// ```
/// use storygen_core::{ChatMessage, ChatRole};
///
/// let mut reply = ChatMessage::model("");
/// reply.append("Wide shot, ");
/// reply.append("golden hour.");
/// assert_eq!(reply.role, ChatRole::Model);
/// assert_eq!(reply.text, "Wide shot, golden hour.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message id
    pub id: MessageId,
    /// Author of the message
    pub role: ChatRole,
    /// Message body
    pub text: String,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message authored by `role`.
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text)
    }

    /// Create a model message.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Model, text)
    }

    /// Append a streamed fragment.
    pub fn append(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }
}
