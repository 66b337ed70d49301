//! Configuration management for Chatkeep
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ChatkeepError, Result};
use crate::providers::ProviderKind;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure for Chatkeep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (Ollama, OpenAI, Groq)
    pub provider: ProviderConfig,
    /// Where conversations are persisted
    #[serde(default)]
    pub storage: StorageConfig,
    /// Conversation defaults
    #[serde(default)]
    pub conversation: ConversationConfig,
}

/// Provider configuration
///
/// Specifies the default provider and model for the CLI, per-provider
/// connection settings, and the catalog of models offered per provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Default provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Default model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// OpenAI configuration
    #[serde(default = "default_openai_config")]
    pub openai: OpenAiCompatibleConfig,

    /// Groq configuration
    #[serde(default = "default_groq_config")]
    pub groq: OpenAiCompatibleConfig,

    /// Models offered per provider, keyed by provider name
    #[serde(default)]
    pub models: BTreeMap<String, Vec<String>>,
}

fn default_provider_type() -> String {
    "ollama".to_string()
}

fn default_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            model: default_model(),
            ollama: OllamaConfig::default(),
            openai: default_openai_config(),
            groq: default_groq_config(),
            models: BTreeMap::new(),
        }
    }
}

impl ProviderConfig {
    /// Models configured for a provider, empty when none are listed
    pub fn models_for(&self, kind: ProviderKind) -> &[String] {
        self.models
            .iter()
            .find(|(name, _)| name.parse::<ProviderKind>().ok() == Some(kind))
            .map(|(_, models)| models.as_slice())
            .unwrap_or(&[])
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
        }
    }
}

/// Configuration for providers speaking the OpenAI chat completions protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiCompatibleConfig {
    /// Base URL, without the trailing `/chat/completions`
    pub api_base: String,

    /// Bearer token; usually supplied through the environment
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_openai_config() -> OpenAiCompatibleConfig {
    OpenAiCompatibleConfig {
        api_base: "https://api.openai.com/v1".to_string(),
        api_key: None,
    }
}

fn default_groq_config() -> OpenAiCompatibleConfig {
    OpenAiCompatibleConfig {
        api_base: "https://api.groq.com/openai/v1".to_string(),
        api_key: None,
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the embedded database; the platform data directory is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the database location, creating its parent directory
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::Storage` if no data directory can be determined
    /// or the parent directory cannot be created
    pub fn resolve_path(&self) -> Result<PathBuf> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => {
                let proj_dirs = ProjectDirs::from("com", "chatkeep", "chatkeep").ok_or_else(|| {
                    ChatkeepError::Storage("Could not determine data directory".into())
                })?;
                proj_dirs.data_dir().join("conversations.db")
            }
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ChatkeepError::Storage(format!("Failed to create data directory: {}", e))
            })?;
        }

        Ok(path)
    }
}

/// Conversation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Title given to conversations created without one
    #[serde(default = "default_title")]
    pub default_title: String,
}

/// Title used when a conversation is created without one
pub const DEFAULT_TITLE: &str = "Untitled Conversation";

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            default_title: default_title(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChatkeepError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ChatkeepError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("CHATKEEP_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(model) = std::env::var("CHATKEEP_MODEL") {
            self.provider.model = model;
        }

        if let Ok(host) = std::env::var("CHATKEEP_OLLAMA_HOST") {
            self.provider.ollama.host = host;
        }

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                self.provider.openai.api_key = Some(key);
            }
        }

        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            if !key.is_empty() {
                self.provider.groq.api_key = Some(key);
            }
        }

        if let Ok(db_path) = std::env::var("CHATKEEP_DB") {
            self.storage.path = Some(PathBuf::from(db_path));
        }

        if let Ok(title) = std::env::var("CHATKEEP_DEFAULT_TITLE") {
            self.conversation.default_title = title;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(path) = &cli.storage_path {
            tracing::info!("Using storage path override from CLI: {}", path.display());
            self.storage.path = Some(path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the default provider is unrecognized, the default
    /// model or title is empty, or the model catalog names an unknown provider
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.trim().is_empty() {
            return Err(ChatkeepError::Config("Provider type cannot be empty".to_string()).into());
        }

        if self.provider.provider_type.parse::<ProviderKind>().is_err() {
            let valid: Vec<&str> = ProviderKind::ALL.iter().map(|k| k.as_str()).collect();
            return Err(ChatkeepError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid.join(", ")
            ))
            .into());
        }

        if self.provider.model.trim().is_empty() {
            return Err(ChatkeepError::Config("provider.model cannot be empty".to_string()).into());
        }

        for name in self.provider.models.keys() {
            if name.parse::<ProviderKind>().is_err() {
                return Err(ChatkeepError::Config(format!(
                    "provider.models lists unknown provider: {}",
                    name
                ))
                .into());
            }
        }

        if self.conversation.default_title.trim().is_empty() {
            return Err(ChatkeepError::Config(
                "conversation.default_title cannot be empty".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            storage: StorageConfig::default(),
            conversation: ConversationConfig::default(),
        }
    }
}
