use crate::providers::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted conversation
///
/// The stored document holds `title`, `messages` and `last_interacted`; the
/// id is the document key and is filled in when the record is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier, immutable after creation
    #[serde(skip)]
    pub id: String,
    /// Human-readable title, never empty
    pub title: String,
    /// Messages in conversation order; append-only
    pub messages: Vec<Message>,
    /// Most recent create, append or read of this conversation
    pub last_interacted: DateTime<Utc>,
}

/// Listing entry for a stored conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Unique identifier of the conversation
    pub id: String,
    /// Title of the conversation
    pub title: String,
    /// When the conversation was last touched
    pub last_interacted: DateTime<Utc>,
    /// Number of messages in the conversation
    pub message_count: usize,
}

impl From<Conversation> for ConversationSummary {
    fn from(conversation: Conversation) -> Self {
        Self {
            message_count: conversation.messages.len(),
            id: conversation.id,
            title: conversation.title,
            last_interacted: conversation.last_interacted,
        }
    }
}
