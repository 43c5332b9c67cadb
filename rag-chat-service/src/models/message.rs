//! Conversation messages and their stored representation.

use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Kind tag used in the history store.
    pub fn store_kind(self) -> &'static str {
        match self {
            MessageRole::User => "human",
            MessageRole::Assistant => "ai",
        }
    }

    fn from_store_kind(kind: &str) -> Option<Self> {
        match kind {
            "human" => Some(MessageRole::User),
            "ai" => Some(MessageRole::Assistant),
            _ => None,
        }
    }
}

/// A single turn in a conversation. The role is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// A message as persisted in the history store.
///
/// The store may hold kinds other than `human` and `ai` (for example
/// `system`); those have no conversational role and are skipped on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: StoredMessageData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessageData {
    #[serde(default)]
    pub content: String,
}

impl StoredMessage {
    pub fn into_message(self) -> Option<Message> {
        MessageRole::from_store_kind(&self.kind).map(|role| Message {
            role,
            content: self.data.content,
        })
    }
}

impl From<&Message> for StoredMessage {
    fn from(message: &Message) -> Self {
        Self {
            kind: message.role.store_kind().to_string(),
            data: StoredMessageData {
                content: message.content.clone(),
            },
        }
    }
}
