//! Special commands parser for interactive chat
//!
//! Lines starting with `/` are handled by the chat loop instead of being sent
//! to the model. Commands are case-insensitive; bare `exit` and `quit` are
//! accepted too.

use colored::Colorize;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Display help information
    Help,

    /// Print the id of the current conversation
    ShowId,

    /// Leave the chat
    Exit,

    /// Not a special command; the line goes to the model
    None,
}

/// Parse a line of chat input
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for an unrecognized `/command`
///
/// # Examples
///
/// ```
/// use chatkeep::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/EXIT").unwrap(), SpecialCommand::Exit);
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/id" => Ok(SpecialCommand::ShowId),
        "/exit" | "/quit" | "exit" | "quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print the special command reference
pub fn print_help() {
    println!("\n{}", "Chat commands:".bold());
    println!("  {}        Show this help", "/help".cyan());
    println!("  {}          Show the current conversation id", "/id".cyan());
    println!("  {}  Leave the chat", "/exit, /quit".cyan());
    println!("\nAnything else is sent to the model.\n");
}
