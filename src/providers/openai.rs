//! OpenAI-compatible provider implementation for Chatkeep
//!
//! OpenAI and Groq both speak the `/chat/completions` protocol, so a single
//! client serves both; the provider kind only selects the base URL and key.

use crate::config::OpenAiCompatibleConfig;
use crate::error::{ChatkeepError, Result};
use crate::providers::{Message, Provider, ProviderKind};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for an OpenAI-compatible chat completions endpoint
///
/// A missing API key is reported when a request is made, not at
/// construction, so building a client never requires credentials.
pub struct OpenAiCompatibleProvider {
    client: Client,
    kind: ProviderKind,
    api_base: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
    #[serde(default)]
    usage: Option<ChatCompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

impl OpenAiCompatibleProvider {
    /// Create a client for `kind` and `model`
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use chatkeep::config::OpenAiCompatibleConfig;
    /// use chatkeep::providers::{OpenAiCompatibleProvider, Provider, ProviderKind};
    ///
    /// let config = OpenAiCompatibleConfig {
    ///     api_base: "https://api.groq.com/openai/v1".to_string(),
    ///     api_key: None,
    /// };
    /// let provider = OpenAiCompatibleProvider::new(ProviderKind::Groq, config, "llama-3.1-8b-instant").unwrap();
    /// assert_eq!(provider.kind(), ProviderKind::Groq);
    /// ```
    pub fn new(
        kind: ProviderKind,
        config: OpenAiCompatibleConfig,
        model: impl Into<String>,
    ) -> Result<Self> {
        let model = model.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent(concat!("chatkeep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChatkeepError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized {} provider: api_base={}, model={}",
            kind,
            config.api_base,
            model
        );

        Ok(Self {
            client,
            kind,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            model,
        })
    }

    /// Base URL requests are sent to
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

#[async_trait]
impl Provider for OpenAiCompatibleProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ChatkeepError::MissingCredentials(self.kind.to_string()))?;

        let url = format!("{}/chat/completions", self.api_base);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        tracing::debug!(
            "Sending {} chat request: {} messages",
            self.kind,
            messages.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("{} request failed: {}", self.kind, e);
                ChatkeepError::Provider(format!("{} request failed: {}", self.kind, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("{} returned error {}: {}", self.kind, status, error_text);
            return Err(ChatkeepError::Provider(format!(
                "{} returned error {}: {}",
                self.kind, status, error_text
            ))
            .into());
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            ChatkeepError::Provider(format!("Failed to parse {} response: {}", self.kind, e))
        })?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                "{} usage: prompt_tokens={}, completion_tokens={}",
                self.kind,
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| {
                ChatkeepError::Provider(format!("{} response contained no choices", self.kind))
                    .into()
            })
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(&[Message::user(prompt)]).await
    }

    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> OpenAiCompatibleConfig {
        OpenAiCompatibleConfig {
            api_base: "http://localhost:1/v1/".to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    #[test]
    fn test_new_trims_api_base() {
        let provider =
            OpenAiCompatibleProvider::new(ProviderKind::OpenAi, config(None), "gpt-4o-mini").unwrap();
        assert_eq!(provider.api_base(), "http://localhost:1/v1");
        assert_eq!(provider.model(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_chat_without_key_is_missing_credentials() {
        let provider =
            OpenAiCompatibleProvider::new(ProviderKind::Groq, config(None), "llama3").unwrap();
        let err = provider.chat(&[Message::user("hi")]).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChatkeepError>(),
            Some(ChatkeepError::MissingCredentials(p)) if p == "groq"
        ));
    }

    #[test]
    fn test_response_parsing_null_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert!(response.choices[0].message.content.is_none());
        assert!(response.usage.is_none());
    }
}
