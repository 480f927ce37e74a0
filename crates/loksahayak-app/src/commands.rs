//! Slash command parsing for the chat loop.

use std::path::PathBuf;

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    Quit,
    History,
    /// Delete by history number, as shown by `/history`.
    Delete(usize),
    /// Cycle the interface language.
    Lang,
    Image(PathBuf),
    /// Toggle voice input.
    Mic,
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/quit" | "/exit" | "/q" => ChatCommand::Quit,
        "/history" => ChatCommand::History,
        "/delete" | "/del" => match arg.map(str::parse::<usize>) {
            Some(Ok(n)) => ChatCommand::Delete(n),
            _ => ChatCommand::Unknown("/delete requires a message number".to_string()),
        },
        "/lang" => ChatCommand::Lang,
        "/image" | "/img" => match arg {
            Some(path) => ChatCommand::Image(PathBuf::from(path)),
            None => ChatCommand::Unknown("/image requires a file path".to_string()),
        },
        "/mic" => ChatCommand::Mic,
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (cmd, about) in [
        ("/history", "Show the conversation, numbered"),
        ("/delete N", "Delete message N from the history"),
        ("/lang", "Switch language (English, Hindi, Bengali)"),
        ("/image PATH", "Upload an image"),
        ("/mic", "Start or stop voice input"),
        ("/help", "Show this help message"),
        ("/quit", "End the chat session"),
    ] {
        println!("  {:<12} {}", style(cmd).cyan(), about);
    }
    println!();
    println!(
        "  {}",
        style("An empty line sends the current input (e.g. a voice transcript).").dim()
    );
    println!();
}
