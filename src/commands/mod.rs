/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`   : Interactive chat backed by the conversation store
- `history`: Listing and inspecting stored conversations
- `models` : The configured model catalog
- `title`  : One-shot title generation

Handlers stay thin: they wire the configured store and client cache into
the library components and render results.
*/

use crate::config::Config;
use crate::conversation::ConversationService;
use crate::error::Result;
use crate::providers::ClientCache;
use crate::storage::ConversationStore;
use std::sync::Arc;

pub mod chat;
pub mod history;
pub mod models;
pub mod special_commands;
pub mod title;

/// Open the configured conversation store and wrap it in a service
///
/// # Errors
///
/// Returns `ChatkeepError::Storage` if the database cannot be located or opened
pub fn open_service(config: &Config) -> Result<ConversationService> {
    let path = config.storage.resolve_path()?;
    let store = ConversationStore::new(path)?
        .with_default_title(config.conversation.default_title.clone());
    Ok(ConversationService::new(Arc::new(store)))
}

/// Build the process-wide client cache from provider settings
pub fn client_cache(config: &Config) -> Arc<ClientCache> {
    Arc::new(ClientCache::from_config(config.provider.clone()))
}
