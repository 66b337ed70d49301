//! Conversation storage
//!
//! Conversations live in an embedded `sled` tree: the key is the
//! conversation id and the value is the JSON document
//! `{title, messages, last_interacted}`. Every change rewrites the whole
//! document through sled's compare-and-swap loop, so two writers touching
//! the same id never lose each other's update and readers never see a
//! partially applied change.

use crate::config::DEFAULT_TITLE;
use crate::error::{ChatkeepError, Result};
use crate::providers::Message;
use chrono::Utc;
use sled::Db;
use std::path::Path;
use uuid::Uuid;

pub mod types;
pub use types::{Conversation, ConversationSummary};

/// Conversation persistence manager
///
/// Safe to share between threads; all methods take `&self`.
pub struct ConversationStore {
    db: Db,
    default_title: String,
}

impl ConversationStore {
    /// Open or create a conversation store
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the database directory
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::Storage` if database cannot be opened
    ///
    /// # Examples
    ///
    /// ```
    /// use chatkeep::storage::ConversationStore;
    ///
    /// # fn main() -> chatkeep::error::Result<()> {
    /// let dir = tempfile::tempdir()?;
    /// let store = ConversationStore::new(dir.path().join("conversations.db"))?;
    /// assert!(store.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = sled::open(path)
            .map_err(|e| ChatkeepError::Storage(format!("Failed to open database: {}", e)))?;
        tracing::info!("Opened conversation store at {}", path.display());
        Ok(Self {
            db,
            default_title: DEFAULT_TITLE.to_string(),
        })
    }

    /// Replace the title given to conversations created without one
    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    /// Title given to conversations created without one
    pub fn default_title(&self) -> &str {
        &self.default_title
    }

    /// Title a conversation created with `title` ends up with
    pub fn resolve_title(&self, title: Option<&str>) -> String {
        match title {
            Some(title) if !title.trim().is_empty() => title.to_string(),
            _ => self.default_title.clone(),
        }
    }

    /// Create a conversation and return its id
    ///
    /// A missing or blank `title` is replaced by the default title. The
    /// conversation starts with `first_message` when one is given.
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::Storage` if the record cannot be written
    pub fn create(&self, title: Option<&str>, first_message: Option<Message>) -> Result<String> {
        let id = new_conversation_id();
        let conversation = Conversation {
            id: id.clone(),
            title: self.resolve_title(title),
            messages: first_message.into_iter().collect(),
            last_interacted: Utc::now(),
        };
        let value = encode(&conversation)?;

        self.db
            .compare_and_swap(id.as_bytes(), None as Option<&[u8]>, Some(value))
            .map_err(|e| ChatkeepError::Storage(format!("Insert failed: {}", e)))?
            .map_err(|_| ChatkeepError::Storage(format!("Conversation id collision: {}", id)))?;
        self.flush()?;

        tracing::debug!(
            "Created conversation {} ({} messages)",
            id,
            conversation.messages.len()
        );
        Ok(id)
    }

    /// Append a message to a conversation and refresh its recency
    ///
    /// The title is left untouched. Appending to an unknown id is a no-op
    /// that still succeeds; the return value tells the two cases apart.
    ///
    /// # Returns
    ///
    /// Returns `true` if the message was stored, `false` if `id` is unknown
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::Storage` if the record cannot be read or written
    pub fn append(&self, id: &str, role: &str, content: &str) -> Result<bool> {
        let message = Message::new(role, content);
        let appended = self.rewrite(id, Some(&message))?.is_some();

        if appended {
            tracing::debug!("Appended {} message to conversation {}", role, id);
        } else {
            tracing::warn!("Dropped {} message for unknown conversation {}", role, id);
        }
        Ok(appended)
    }

    /// Load a conversation, refreshing its recency
    ///
    /// This is a write-through read: `last_interacted` is updated and
    /// persisted before the updated conversation is returned.
    ///
    /// # Returns
    ///
    /// Returns `None` if no conversation has this id
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::Storage` if the record cannot be read or written
    pub fn get(&self, id: &str) -> Result<Option<Conversation>> {
        self.rewrite(id, None)
    }

    /// Summaries of every conversation, most recently touched first
    ///
    /// Conversations touched at the same instant keep their key order.
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::Storage` if iteration or deserialization fails
    pub fn list_summaries(&self) -> Result<Vec<ConversationSummary>> {
        let mut summaries = Vec::new();
        for entry in self.db.iter() {
            let (key, value) =
                entry.map_err(|e| ChatkeepError::Storage(format!("Iteration failed: {}", e)))?;
            let id = String::from_utf8_lossy(&key).into_owned();
            summaries.push(ConversationSummary::from(decode(&id, &value)?));
        }

        summaries.sort_by(|a, b| b.last_interacted.cmp(&a.last_interacted));
        Ok(summaries)
    }

    /// Number of stored conversations
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Whether the store holds no conversations
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Atomically rewrite one conversation, optionally appending `message`
    ///
    /// The closure handed to sled may run several times under contention, so
    /// it only derives the new document from the current one.
    fn rewrite(&self, id: &str, message: Option<&Message>) -> Result<Option<Conversation>> {
        let mut failure: Option<ChatkeepError> = None;

        let updated = self
            .db
            .update_and_fetch(id.as_bytes(), |current| {
                failure = None;
                let current = current?;
                match touch(id, current, message) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        // Keep the stored document as it was.
                        failure = Some(e);
                        Some(current.to_vec())
                    }
                }
            })
            .map_err(|e| ChatkeepError::Storage(format!("Update failed: {}", e)))?;

        if let Some(e) = failure {
            return Err(e.into());
        }

        match updated {
            Some(value) => {
                self.flush()?;
                Ok(Some(decode(id, &value)?))
            }
            None => Ok(None),
        }
    }

    fn flush(&self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| ChatkeepError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }
}

/// Decode `current`, apply the change and re-encode it
///
/// `last_interacted` never moves backwards, even if the clock does.
fn touch(
    id: &str,
    current: &[u8],
    message: Option<&Message>,
) -> std::result::Result<Vec<u8>, ChatkeepError> {
    let mut conversation = decode(id, current)?;
    if let Some(message) = message {
        conversation.messages.push(message.clone());
    }
    conversation.last_interacted = conversation.last_interacted.max(Utc::now());
    encode(&conversation)
}

fn encode(conversation: &Conversation) -> std::result::Result<Vec<u8>, ChatkeepError> {
    serde_json::to_vec(conversation)
        .map_err(|e| ChatkeepError::Storage(format!("Serialization failed: {}", e)))
}

fn decode(id: &str, value: &[u8]) -> std::result::Result<Conversation, ChatkeepError> {
    let mut conversation: Conversation = serde_json::from_slice(value).map_err(|e| {
        ChatkeepError::Storage(format!("Deserialization failed for {}: {}", id, e))
    })?;
    conversation.id = id.to_string();
    Ok(conversation)
}

/// Generate a new conversation id
///
/// Random 128-bit UUIDv4, rendered in the hyphenated form.
///
/// # Examples
///
/// ```
/// use chatkeep::storage::new_conversation_id;
///
/// let id = new_conversation_id();
/// assert_eq!(id.len(), 36);
/// ```
pub fn new_conversation_id() -> String {
    Uuid::new_v4().to_string()
}
