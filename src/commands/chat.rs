//! Interactive chat handler
//!
//! Runs a readline loop that sends each line to the model through a
//! [`ChatSession`], so every exchange lands in the conversation store.

use crate::chat::ChatSession;
use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::commands::{client_cache, open_service};
use crate::config::Config;
use crate::error::{ChatkeepError, Result};
use crate::providers::ProviderKind;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Options for an interactive chat
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Provider override
    pub provider: Option<String>,
    /// Model override
    pub model: Option<String>,
    /// Conversation to continue
    pub resume: Option<String>,
    /// Title for a new conversation
    pub title: Option<String>,
    /// Let the model title a new conversation
    pub auto_title: bool,
}

/// Start interactive chat
///
/// # Errors
///
/// Returns `ChatkeepError::UnsupportedProvider` for an unknown provider,
/// `ChatkeepError::NotFound` when resuming an unknown conversation, and
/// storage or readline errors. Model errors are reported and the loop goes on.
///
/// # Examples
///
/// ```no_run
/// use chatkeep::commands::chat::{run_chat, ChatOptions};
/// use chatkeep::config::Config;
///
/// # async fn example() -> anyhow::Result<()> {
/// run_chat(Config::default(), ChatOptions::default()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_chat(config: Config, options: ChatOptions) -> Result<()> {
    let provider = options
        .provider
        .unwrap_or_else(|| config.provider.provider_type.clone());
    let kind: ProviderKind = provider.parse()?;
    let model = options
        .model
        .unwrap_or_else(|| config.provider.model.clone());

    let service = open_service(&config)?;
    let cache = client_cache(&config);
    let mut session = ChatSession::new(service.clone(), cache, kind.as_str(), model.as_str())
        .with_auto_title(options.auto_title);

    if let Some(title) = options.title {
        session = session.with_title(title);
    }

    if let Some(id) = options.resume {
        let conversation = service
            .fetch(&id)?
            .ok_or_else(|| ChatkeepError::NotFound(id.clone()))?;
        println!(
            "Resuming {} ({} messages)",
            conversation.title.bold(),
            conversation.messages.len()
        );
        session = session.resume(id);
    }

    print_welcome_banner(&session);

    let mut rl = DefaultEditor::new()?;
    let prompt = format!("{} ", ">>".green().bold());

    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_special_command(trimmed) {
                    Ok(SpecialCommand::Help) => {
                        print_help();
                        continue;
                    }
                    Ok(SpecialCommand::ShowId) => {
                        match session.conversation_id() {
                            Some(id) => println!("{}\n", id.cyan()),
                            None => println!("{}\n", "No conversation yet.".yellow()),
                        }
                        continue;
                    }
                    Ok(SpecialCommand::Exit) => break,
                    Ok(SpecialCommand::None) => {}
                    Err(e) => {
                        eprintln!("{}\n", e.to_string().red());
                        continue;
                    }
                }

                rl.add_history_entry(trimmed)?;

                match session.send(trimmed).await {
                    Ok(reply) => println!("\n{}\n", reply),
                    Err(e) => eprintln!("{}\n", format!("Error: {}", e).red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {:?}", err);
                break;
            }
        }
    }

    if let Some(id) = session.conversation_id() {
        println!("Conversation saved as {}", id.cyan());
    }
    println!("Goodbye!");
    Ok(())
}

fn print_welcome_banner(session: &ChatSession) {
    println!("\n{}", "Chatkeep".bold());
    println!("Provider: {}", session.provider().cyan());
    println!("Model:    {}", session.model().cyan());
    println!("Type '/help' for available commands, '/exit' to quit\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_chat_rejects_unknown_provider() {
        let options = ChatOptions {
            provider: Some("bedrock".to_string()),
            ..ChatOptions::default()
        };
        let err = run_chat(Config::default(), options).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChatkeepError>(),
            Some(ChatkeepError::UnsupportedProvider(_))
        ));
    }

    #[tokio::test]
    async fn test_run_chat_resume_unknown_conversation() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.path = Some(dir.path().join("conversations.db"));
        let options = ChatOptions {
            resume: Some("missing".to_string()),
            ..ChatOptions::default()
        };

        let err = run_chat(config, options).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChatkeepError>(),
            Some(ChatkeepError::NotFound(id)) if id == "missing"
        ));
    }
}
