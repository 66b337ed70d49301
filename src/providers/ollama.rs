//! Ollama provider implementation for Chatkeep
//!
//! This module implements the Provider trait for Ollama, connecting to a local
//! or remote Ollama server through its `/api/chat` and `/api/generate`
//! endpoints with streaming disabled.

use crate::config::OllamaConfig;
use crate::error::{ChatkeepError, Result};
use crate::providers::{Message, Provider, ProviderKind};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama API client bound to one model
///
/// # Examples
///
/// ```no_run
/// use chatkeep::config::OllamaConfig;
/// use chatkeep::providers::{Message, OllamaProvider, Provider};
///
/// # async fn example() -> chatkeep::error::Result<()> {
/// let provider = OllamaProvider::new(OllamaConfig::default(), "llama3.2:latest")?;
/// let reply = provider.chat(&[Message::user("Hello!")]).await?;
/// # Ok(())
/// # }
/// ```
pub struct OllamaProvider {
    client: Client,
    host: String,
    model: String,
}

/// Request body for `/api/chat`
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

/// Request body for `/api/generate`
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Message structure returned by Ollama
#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

/// Response from `/api/chat`
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

/// Response from `/api/generate`
#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaProvider {
    /// Create a new Ollama client for `model`
    ///
    /// No request is made; the server is contacted on the first call.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: OllamaConfig, model: impl Into<String>) -> Result<Self> {
        let model = model.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent(concat!("chatkeep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChatkeepError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Ollama provider: host={}, model={}",
            config.host,
            model
        );

        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
            model,
        })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.host
    }

    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<R> {
        let url = format!("{}{}", self.host, endpoint);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                ChatkeepError::Provider(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(ChatkeepError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            ChatkeepError::Provider(format!("Failed to parse Ollama response: {}", e)).into()
        })
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String> {
        tracing::debug!("Sending Ollama chat request: {} messages", messages.len());

        let request = OllamaChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };
        let response: OllamaChatResponse = self.post_json("/api/chat", &request).await?;

        tracing::debug!(
            "Ollama response: prompt_tokens={}, completion_tokens={}",
            response.prompt_eval_count,
            response.eval_count
        );

        Ok(response.message.content)
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };
        let response: OllamaGenerateResponse = self.post_json("/api/generate", &request).await?;
        Ok(response.response)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    fn model(&self) -> &str {
        &self.model
    }
}
