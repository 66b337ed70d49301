use async_trait::async_trait;
use chatkeep::providers::{ClientFactory, ClientHandle, Message, Provider, ProviderKind};
use chatkeep::storage::ConversationStore;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn create_temp_store() -> (ConversationStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("conversations.db");
    let store = ConversationStore::new(db_path).expect("failed to open conversation store");
    (store, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Client that echoes the last message back
#[allow(dead_code)]
pub struct EchoClient {
    kind: ProviderKind,
    model: String,
}

#[async_trait]
impl Provider for EchoClient {
    async fn chat(&self, messages: &[Message]) -> chatkeep::Result<String> {
        Ok(messages
            .last()
            .map(|m| format!("echo: {}", m.content))
            .unwrap_or_default())
    }

    async fn complete(&self, prompt: &str) -> chatkeep::Result<String> {
        Ok(format!("echo: {}", prompt))
    }

    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Factory counting how many [`EchoClient`]s it built
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct EchoFactory {
    builds: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl EchoFactory {
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl ClientFactory for EchoFactory {
    fn build(&self, kind: ProviderKind, model: &str) -> chatkeep::Result<ClientHandle> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(EchoClient {
            kind,
            model: model.to_string(),
        }))
    }
}
