//! Single-slot LLM client cache
//!
//! Holds at most one live client, keyed by (provider, model). Asking for the
//! same key again returns the cached client; asking for any other key builds
//! a new client and evicts the previous one entirely. The cache never closes
//! evicted clients: whoever still holds a handle keeps it alive until dropped.
//!
//! Construction happens outside the slot lock, so two racing misses may both
//! build a client. The last one to swap in is the one later callers see.

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::providers::{create_provider, Provider, ProviderKind};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared handle to a constructed client
pub type ClientHandle = Arc<dyn Provider>;

/// Identity of a cached client
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey {
    /// Provider the client talks to
    pub provider: ProviderKind,
    /// Model the client was built for
    pub model: String,
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

/// Builds clients on cache misses
pub trait ClientFactory: Send + Sync {
    /// Construct a new client for `kind` and `model`
    ///
    /// # Errors
    ///
    /// Returns error if the client cannot be constructed
    fn build(&self, kind: ProviderKind, model: &str) -> Result<ClientHandle>;
}

/// Factory that builds real provider clients from configuration
#[derive(Debug, Clone)]
pub struct ConfiguredClientFactory {
    config: ProviderConfig,
}

impl ConfiguredClientFactory {
    /// Create a factory over the given provider settings
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }
}

impl ClientFactory for ConfiguredClientFactory {
    fn build(&self, kind: ProviderKind, model: &str) -> Result<ClientHandle> {
        create_provider(kind, model, &self.config)
    }
}

struct CachedClient {
    key: ClientKey,
    client: ClientHandle,
}

/// Single-slot cache of LLM clients
///
/// Constructed once at startup and shared (usually behind an `Arc`) with
/// everything that needs a client.
///
/// # Examples
///
/// ```
/// use chatkeep::config::ProviderConfig;
/// use chatkeep::providers::ClientCache;
/// use std::sync::Arc;
///
/// # fn main() -> chatkeep::error::Result<()> {
/// let cache = ClientCache::from_config(ProviderConfig::default());
/// let first = cache.get_or_create("ollama", "llama3.2:latest")?;
/// let again = cache.get_or_create("ollama", "llama3.2:latest")?;
/// assert!(Arc::ptr_eq(&first, &again));
/// # Ok(())
/// # }
/// ```
pub struct ClientCache {
    factory: Box<dyn ClientFactory>,
    slot: Mutex<Option<CachedClient>>,
}

impl ClientCache {
    /// Create an empty cache that builds clients with `factory`
    pub fn new(factory: impl ClientFactory + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            slot: Mutex::new(None),
        }
    }

    /// Create an empty cache that builds real clients from `config`
    pub fn from_config(config: ProviderConfig) -> Self {
        Self::new(ConfiguredClientFactory::new(config))
    }

    /// Return the client for (`provider`, `model`), building it on a miss
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::UnsupportedProvider` if `provider` is not a
    /// recognized provider name; the slot is left untouched in that case.
    /// Factory errors are propagated unchanged.
    pub fn get_or_create(&self, provider: &str, model: &str) -> Result<ClientHandle> {
        let kind: ProviderKind = provider.parse()?;
        let key = ClientKey {
            provider: kind,
            model: model.to_string(),
        };

        if let Some(cached) = self.slot().as_ref().filter(|cached| cached.key == key) {
            tracing::debug!("Client cache hit for {}", key);
            return Ok(Arc::clone(&cached.client));
        }

        tracing::debug!("Client cache miss for {}, building client", key);
        let client = self.factory.build(kind, model)?;

        let mut slot = self.slot();
        if let Some(previous) = slot.as_ref() {
            if previous.key != key {
                tracing::debug!("Evicting cached client {}", previous.key);
            }
        }
        *slot = Some(CachedClient {
            key,
            client: Arc::clone(&client),
        });

        Ok(client)
    }

    /// Clear the slot; the next `get_or_create` always builds a fresh client
    pub fn reset(&self) {
        if let Some(previous) = self.slot().take() {
            tracing::debug!("Client cache reset, dropped {}", previous.key);
        }
    }

    /// Key of the client currently held, if any
    pub fn current_key(&self) -> Option<ClientKey> {
        self.slot().as_ref().map(|cached| cached.key.clone())
    }

    // The slot is only ever replaced by a single assignment, so a guard
    // recovered from a poisoned lock still holds a consistent value.
    fn slot(&self) -> MutexGuard<'_, Option<CachedClient>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
