//! Chatkeep - persistent multi-turn chats with local and hosted LLMs
//!
#![doc = "Main entry point for the Chatkeep application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatkeep::cli::{Cli, Commands, ModelCommand};
use chatkeep::commands;
use chatkeep::commands::chat::ChatOptions;
use chatkeep::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Chat {
            provider,
            model,
            resume,
            title,
            auto_title,
        } => {
            if let Some(r) = &resume {
                tracing::debug!("Resuming conversation: {}", r);
            }
            let options = ChatOptions {
                provider,
                model,
                resume,
                title,
                auto_title,
            };
            commands::chat::run_chat(config, options).await?;
            Ok(())
        }
        Commands::History { command } => {
            let service = commands::open_service(&config)?;
            commands::history::handle_history(&service, command)?;
            Ok(())
        }
        Commands::Models { command } => match command {
            ModelCommand::List { provider } => {
                commands::models::list_models(&config, provider.as_deref())?;
                Ok(())
            }
        },
        Commands::Title {
            provider,
            model,
            query,
        } => {
            let provider = provider.unwrap_or_else(|| config.provider.provider_type.clone());
            let model = model.unwrap_or_else(|| config.provider.model.clone());
            let cache = commands::client_cache(&config);
            commands::title::run_title(&cache, &provider, &model, &query).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `chatkeep=info`, or `chatkeep=debug`
/// with `--verbose`. Logs go to stderr so they never mix with command output.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "chatkeep=debug"
    } else {
        "chatkeep=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
