use crate::cli::HistoryCommand;
use crate::conversation::ConversationService;
use crate::error::{ChatkeepError, Result};
use crate::storage::{Conversation, ConversationSummary};
use colored::Colorize;
use prettytable::{format, Table};

const TITLE_WIDTH: usize = 40;

/// Handle history commands
pub fn handle_history(service: &ConversationService, command: HistoryCommand) -> Result<()> {
    match command {
        HistoryCommand::List => {
            let summaries = service.list_all()?;

            if summaries.is_empty() {
                println!("{}", "No conversation history found.".yellow());
                return Ok(());
            }

            println!("\nConversation History:");
            history_table(&summaries).printstd();
            println!();
            println!(
                "Use {} to resume a conversation.",
                "chatkeep chat --resume <ID>".cyan()
            );
            println!();
        }
        HistoryCommand::Show { id } => {
            let conversation = service
                .fetch(&id)?
                .ok_or_else(|| ChatkeepError::NotFound(id.clone()))?;
            print_conversation(&conversation);
        }
    }

    Ok(())
}

fn history_table(summaries: &[ConversationSummary]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "ID".bold(),
        "Title".bold(),
        "Messages".bold(),
        "Last Interacted".bold()
    ]);

    for summary in summaries {
        let updated = summary
            .last_interacted
            .format("%Y-%m-%d %H:%M")
            .to_string();

        table.add_row(prettytable::row![
            summary.id.as_str().cyan(),
            truncate_title(&summary.title),
            summary.message_count,
            updated
        ]);
    }

    table
}

fn print_conversation(conversation: &Conversation) {
    println!("\n{}", conversation.title.bold());
    println!(
        "{} {}  {} {}\n",
        "ID:".dimmed(),
        conversation.id,
        "Messages:".dimmed(),
        conversation.messages.len()
    );

    for message in &conversation.messages {
        let role = match message.role.as_str() {
            "user" => message.role.green().bold(),
            "assistant" => message.role.blue().bold(),
            _ => message.role.yellow().bold(),
        };
        println!("{}: {}\n", role, message.content);
    }
}

/// Shorten a title to fit the history table
fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_WIDTH {
        let head: String = title.chars().take(TITLE_WIDTH - 3).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}
