//! Error types for Chatkeep
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Chatkeep operations
///
/// Covers configuration loading, provider construction and calls,
/// conversation storage, and title extraction. Operations return
/// [`Result`], so callers that need to branch on a specific failure
/// use `downcast_ref::<ChatkeepError>()`.
#[derive(Error, Debug)]
pub enum ChatkeepError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (API calls, malformed responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Requested provider is not one of the recognized provider kinds
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Missing credentials for provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// Conversation storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// A conversation that must exist was not found
    #[error("Conversation not found: {0}")]
    NotFound(String),

    /// The model did not answer the title prompt with a usable title
    #[error("Title parse error: {0}")]
    TitleParse(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Chatkeep operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
