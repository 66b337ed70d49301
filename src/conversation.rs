//! Conversation use cases
//!
//! [`ConversationService`] turns store operations into the three things a
//! front end does with conversations: start one, add a message to one, and
//! list them. It also bridges "first message of a new chat" and "continuing
//! message": adding a message without an id always starts a new conversation.

use crate::error::Result;
use crate::providers::Message;
use crate::storage::{Conversation, ConversationStore, ConversationSummary};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of starting a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedConversation {
    /// Id of the new conversation
    pub id: String,
    /// Title the conversation was stored with, after defaulting
    pub title: String,
    /// First message, when one was supplied
    pub first_message: Option<Message>,
}

/// Result of adding a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedMessage {
    /// Conversation the message belongs to
    pub id: String,
    /// Whether a new conversation was created for the message
    pub created: bool,
    /// Whether the message was persisted; `false` when `id` was unknown
    pub stored: bool,
}

/// Orchestrates conversation storage
///
/// Cheap to clone; clones share the underlying store.
#[derive(Clone)]
pub struct ConversationService {
    store: Arc<ConversationStore>,
}

impl ConversationService {
    /// Create a service over `store`
    pub fn new(store: Arc<ConversationStore>) -> Self {
        Self { store }
    }

    /// Underlying store
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Start a conversation
    ///
    /// The conversation gets a first message only when both `role` and
    /// `content` are given.
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::Storage` if the conversation cannot be written
    ///
    /// # Examples
    ///
    /// ```
    /// use chatkeep::conversation::ConversationService;
    /// use chatkeep::storage::ConversationStore;
    /// use std::sync::Arc;
    ///
    /// # fn main() -> chatkeep::error::Result<()> {
    /// let dir = tempfile::tempdir()?;
    /// let store = ConversationStore::new(dir.path().join("conversations.db"))?;
    /// let service = ConversationService::new(Arc::new(store));
    ///
    /// let created = service.start_conversation(None, Some("user"), Some("Hi"))?;
    /// assert_eq!(created.title, "Untitled Conversation");
    /// assert!(created.first_message.is_some());
    /// # Ok(())
    /// # }
    /// ```
    pub fn start_conversation(
        &self,
        title: Option<&str>,
        role: Option<&str>,
        content: Option<&str>,
    ) -> Result<CreatedConversation> {
        let first_message = match (role, content) {
            (Some(role), Some(content)) => Some(Message::new(role, content)),
            _ => None,
        };

        let id = self.store.create(title, first_message.clone())?;
        Ok(CreatedConversation {
            id,
            title: self.store.resolve_title(title),
            first_message,
        })
    }

    /// Add a message, starting a new conversation when `conversation_id` is `None`
    ///
    /// A message for an unknown id is dropped; the returned
    /// [`AddedMessage::stored`] is `false` in that case.
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::Storage` if the conversation cannot be written
    pub fn add_message(
        &self,
        conversation_id: Option<&str>,
        role: &str,
        content: &str,
    ) -> Result<AddedMessage> {
        match conversation_id {
            Some(id) => {
                let stored = self.store.append(id, role, content)?;
                Ok(AddedMessage {
                    id: id.to_string(),
                    created: false,
                    stored,
                })
            }
            None => {
                let id = self
                    .store
                    .create(None, Some(Message::new(role, content)))?;
                Ok(AddedMessage {
                    id,
                    created: true,
                    stored: true,
                })
            }
        }
    }

    /// Load a conversation; this refreshes its recency
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::Storage` if the conversation cannot be read
    pub fn fetch(&self, id: &str) -> Result<Option<Conversation>> {
        self.store.get(id)
    }

    /// Every conversation, most recently touched first
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::Storage` if the store cannot be scanned
    pub fn list_all(&self) -> Result<Vec<ConversationSummary>> {
        self.store.list_summaries()
    }
}
