//! Provider module for Chatkeep
//!
//! This module contains the LLM provider abstraction, the Ollama and
//! OpenAI-compatible client implementations, and the single-slot client
//! cache that hands clients out to callers.

pub mod base;
pub mod cache;
pub mod ollama;
pub mod openai;

pub use base::{Message, Provider, ProviderKind};
pub use cache::{ClientCache, ClientFactory, ClientHandle, ClientKey, ConfiguredClientFactory};
pub use ollama::OllamaProvider;
pub use openai::OpenAiCompatibleProvider;

use crate::config::ProviderConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create a client for `kind` bound to `model`
///
/// # Arguments
///
/// * `kind` - Which provider to talk to
/// * `model` - Model name, passed through to the provider unvalidated
/// * `config` - Provider connection settings
///
/// # Errors
///
/// Returns error if the underlying HTTP client cannot be built
///
/// # Examples
///
/// ```
/// use chatkeep::config::ProviderConfig;
/// use chatkeep::providers::{create_provider, ProviderKind};
///
/// let client = create_provider(ProviderKind::Ollama, "llama3.2:latest", &ProviderConfig::default()).unwrap();
/// assert_eq!(client.model(), "llama3.2:latest");
/// ```
pub fn create_provider(
    kind: ProviderKind,
    model: &str,
    config: &ProviderConfig,
) -> Result<ClientHandle> {
    Ok(match kind {
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(config.ollama.clone(), model)?),
        ProviderKind::OpenAi => Arc::new(OpenAiCompatibleProvider::new(
            kind,
            config.openai.clone(),
            model,
        )?),
        ProviderKind::Groq => Arc::new(OpenAiCompatibleProvider::new(
            kind,
            config.groq.clone(),
            model,
        )?),
    })
}
