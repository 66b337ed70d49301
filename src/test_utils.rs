//! Test utilities for Chatkeep
//!
//! Temporary stores and stub LLM clients shared by unit tests.

use crate::error::{ChatkeepError, Result};
use crate::providers::{ClientFactory, ClientHandle, Message, Provider, ProviderKind};
use crate::storage::ConversationStore;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Create a store backed by a fresh temporary directory
///
/// Returns the `TempDir` too so the caller keeps the directory alive.
pub fn temp_store() -> (ConversationStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let store = ConversationStore::new(dir.path().join("conversations.db"))
        .expect("Failed to open store");
    (store, dir)
}

/// Client that answers with a fixed reply and records every chat history
pub struct StubProvider {
    kind: ProviderKind,
    model: String,
    reply: String,
    chats: Arc<Mutex<Vec<Vec<Message>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Provider for StubProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String> {
        self.chats.lock().unwrap().push(messages.to_vec());
        Ok(self.reply.clone())
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Factory that counts constructions and hands out [`StubProvider`]s
#[derive(Clone)]
pub struct CountingFactory {
    builds: Arc<AtomicUsize>,
    fail_model: Option<String>,
    reply: String,
    chats: Arc<Mutex<Vec<Vec<Message>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Default for CountingFactory {
    fn default() -> Self {
        Self::replying("stub reply")
    }
}

impl CountingFactory {
    /// Factory whose clients always answer `reply`
    pub fn replying(reply: &str) -> Self {
        Self {
            builds: Arc::new(AtomicUsize::new(0)),
            fail_model: None,
            reply: reply.to_string(),
            chats: Arc::default(),
            prompts: Arc::default(),
        }
    }

    /// Factory that refuses to build clients for `model`
    pub fn failing_for(model: &str) -> Self {
        Self {
            fail_model: Some(model.to_string()),
            ..Self::default()
        }
    }

    /// Number of clients built so far
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Histories passed to `chat`, oldest first
    pub fn chats(&self) -> Vec<Vec<Message>> {
        self.chats.lock().unwrap().clone()
    }

    /// Prompts passed to `complete`, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ClientFactory for CountingFactory {
    fn build(&self, kind: ProviderKind, model: &str) -> Result<ClientHandle> {
        if self.fail_model.as_deref() == Some(model) {
            return Err(ChatkeepError::Provider(format!("cannot build {}", model)).into());
        }
        self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(StubProvider {
            kind,
            model: model.to_string(),
            reply: self.reply.clone(),
            chats: Arc::clone(&self.chats),
            prompts: Arc::clone(&self.prompts),
        }))
    }
}
