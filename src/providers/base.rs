//! Base provider trait and common types for Chatkeep
//!
//! This module defines the Provider trait that all LLM clients implement,
//! the closed set of recognized provider kinds, and the role/content
//! message type shared by providers and conversation storage.

use crate::error::{ChatkeepError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Message structure for conversation
///
/// A single role-tagged entry in a conversation. The role is supplied by
/// the caller (usually `system`, `user` or `assistant`) and is not
/// validated by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user, assistant, system)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a message with an arbitrary role
    ///
    /// # Examples
    ///
    /// ```
    /// use chatkeep::providers::Message;
    ///
    /// let msg = Message::new("tool", "42");
    /// assert_eq!(msg.role, "tool");
    /// ```
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use chatkeep::providers::Message;
    ///
    /// let msg = Message::user("Hello, assistant!");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    /// Creates a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }
}

/// Recognized LLM providers
///
/// Adding a provider means adding a variant here and a construction arm in
/// [`crate::providers::ConfiguredClientFactory`]; the compiler flags every
/// match that needs updating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local or remote Ollama server
    Ollama,
    /// OpenAI chat completions API
    OpenAi,
    /// Groq's OpenAI-compatible API
    Groq,
}

impl ProviderKind {
    /// Every recognized provider, in display order
    pub const ALL: [ProviderKind; 3] = [ProviderKind::Ollama, ProviderKind::OpenAi, ProviderKind::Groq];

    /// Canonical lowercase name used in configuration and on the CLI
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
            Self::Groq => "groq",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ChatkeepError;

    /// Parses a provider name, ignoring case and surrounding whitespace
    ///
    /// # Examples
    ///
    /// ```
    /// use chatkeep::providers::ProviderKind;
    ///
    /// assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
    /// assert!("bedrock".parse::<ProviderKind>().is_err());
    /// ```
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            "groq" => Ok(Self::Groq),
            _ => Err(ChatkeepError::UnsupportedProvider(s.to_string())),
        }
    }
}

/// Capability shared by every LLM client
///
/// A client is bound to exactly one (provider, model) pair at construction
/// and turns either a role/content history or a single prompt into text.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Sends a conversation history and returns the assistant's reply text
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or the response is invalid
    async fn chat(&self, messages: &[Message]) -> Result<String>;

    /// Sends a single prompt and returns the completion text
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or the response is invalid
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// The provider this client talks to
    fn kind(&self) -> ProviderKind;

    /// The model this client was built for
    fn model(&self) -> &str;
}
