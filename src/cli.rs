//! Command-line interface definition for Chatkeep
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chatting, browsing history, listing models and
//! generating titles.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chatkeep - persistent multi-turn chats with local and hosted LLMs
#[derive(Parser, Debug, Clone)]
#[command(name = "chatkeep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the conversation database location
    #[arg(long, global = true)]
    pub storage_path: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Chatkeep
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat
    Chat {
        /// Override the provider from config (ollama, openai, groq)
        #[arg(short, long)]
        provider: Option<String>,

        /// Override the model from config
        #[arg(short, long)]
        model: Option<String>,

        /// Continue an existing conversation
        #[arg(short, long, value_name = "ID")]
        resume: Option<String>,

        /// Title for a new conversation
        #[arg(short, long, conflicts_with = "resume")]
        title: Option<String>,

        /// Let the model title a new conversation
        #[arg(long)]
        auto_title: bool,
    },

    /// Browse stored conversations
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Inspect the configured model catalog
    Models {
        /// Model subcommand
        #[command(subcommand)]
        command: ModelCommand,
    },

    /// Generate a short title for a query
    Title {
        /// Override the provider from config (ollama, openai, groq)
        #[arg(short, long)]
        provider: Option<String>,

        /// Override the model from config
        #[arg(short, long)]
        model: Option<String>,

        /// Text to title
        query: String,
    },
}

/// History subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List conversations, most recent first
    List,

    /// Show every message of one conversation
    Show {
        /// Conversation id
        id: String,
    },
}

/// Model catalog subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ModelCommand {
    /// List configured models
    List {
        /// Only show models of this provider (ollama, openai, groq)
        #[arg(short, long)]
        provider: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            storage_path: None,
            command: Commands::History {
                command: HistoryCommand::List,
            },
        }
    }
}
