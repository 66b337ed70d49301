//! Chatkeep - persistent multi-turn chats with local and hosted LLMs
//!
//! This library provides conversation persistence over an embedded `sled`
//! database, a single-slot cache of LLM clients, and the chat and title
//! collaborators that tie the two together.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `storage`: Durable conversation store and id generation
//! - `conversation`: Conversation use cases (start, add message, list)
//! - `providers`: LLM provider abstraction, Ollama and OpenAI-compatible clients, client cache
//! - `chat`: Chat replies, title generation, and interactive chat sessions
//! - `prompts`: Prompt text sent to models outside of a conversation
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use chatkeep::{ClientCache, Config, ConversationService, ConversationStore};
//! use std::sync::Arc;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let store = ConversationStore::new(config.storage.resolve_path()?)?;
//!     let service = ConversationService::new(Arc::new(store));
//!     let cache = ClientCache::from_config(config.provider.clone());
//!
//!     let added = service.add_message(None, "user", "What is Rust?")?;
//!     let client = cache.get_or_create("ollama", "llama3.2:latest")?;
//!     println!("{} via {}", added.id, client.model());
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod storage;

// Re-export commonly used types
pub use chat::ChatSession;
pub use config::Config;
pub use conversation::{AddedMessage, ConversationService, CreatedConversation};
pub use error::{ChatkeepError, Result};
pub use providers::{ClientCache, Message, Provider, ProviderKind};
pub use storage::{new_conversation_id, Conversation, ConversationStore, ConversationSummary};

#[cfg(test)]
pub mod test_utils;
