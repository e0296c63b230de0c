//! Clipboard Ollama - Commands
//!
//! User actions the frontend can send to the shell

pub mod handlers;

use std::str::FromStr;

pub use handlers::{execute, CommandResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send the displayed clipboard text
    Send,
    /// Re-read the clipboard into the display
    Refresh,
    ClearResponse,
    Monitor(bool),
    Hotkey(bool),
    /// Rediscover models
    Models,
    SelectModel(String),
    /// Probe the server
    Status,
    History,
    ClearHistory,
    AllowShow,
    AllowAdd(String),
    AllowRemove(String),
    AllowSave,
    AllowLoad,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandParseError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("Expected 'on' or 'off', got '{0}'")]
    InvalidSwitch(String),
}

fn parse_switch(value: &str) -> Result<bool, CommandParseError> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Ok(true),
        "off" | "false" | "0" | "no" => Ok(false),
        other => Err(CommandParseError::InvalidSwitch(other.to_string())),
    }
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "" => Err(CommandParseError::Empty),
            "send" | "s" => Ok(Command::Send),
            "refresh" | "r" => Ok(Command::Refresh),
            "clear" => Ok(Command::ClearResponse),
            "monitor" if rest.is_empty() => Err(CommandParseError::MissingArgument("monitor")),
            "monitor" => parse_switch(rest).map(Command::Monitor),
            "hotkey" if rest.is_empty() => Err(CommandParseError::MissingArgument("hotkey")),
            "hotkey" => parse_switch(rest).map(Command::Hotkey),
            "models" => Ok(Command::Models),
            "model" if rest.is_empty() => Err(CommandParseError::MissingArgument("model")),
            "model" => Ok(Command::SelectModel(rest.to_string())),
            "status" => Ok(Command::Status),
            "history" => match rest {
                "" => Ok(Command::History),
                "clear" => Ok(Command::ClearHistory),
                other => Err(CommandParseError::Unknown(format!("history {}", other))),
            },
            "allow" => {
                let (action, pattern) = match rest.split_once(char::is_whitespace) {
                    Some((action, pattern)) => (action, pattern.trim()),
                    None => (rest, ""),
                };
                match action {
                    "" | "list" => Ok(Command::AllowShow),
                    "add" if pattern.is_empty() => Err(CommandParseError::MissingArgument("allow add")),
                    "add" => Ok(Command::AllowAdd(pattern.to_string())),
                    "remove" | "rm" if pattern.is_empty() => Err(CommandParseError::MissingArgument("allow remove")),
                    "remove" | "rm" => Ok(Command::AllowRemove(pattern.to_string())),
                    "save" => Ok(Command::AllowSave),
                    "load" => Ok(Command::AllowLoad),
                    other => Err(CommandParseError::Unknown(format!("allow {}", other))),
                }
            }
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandParseError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_commands() {
        assert_eq!("send".parse::<Command>(), Ok(Command::Send));
        assert_eq!("  Refresh ".parse::<Command>(), Ok(Command::Refresh));
        assert_eq!("history clear".parse::<Command>(), Ok(Command::ClearHistory));
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn parses_arguments() {
        assert_eq!("monitor off".parse::<Command>(), Ok(Command::Monitor(false)));
        assert_eq!("hotkey ON".parse::<Command>(), Ok(Command::Hotkey(true)));
        assert_eq!("model llama3.2:3b".parse::<Command>(), Ok(Command::SelectModel("llama3.2:3b".to_string())));
        assert_eq!("allow add  example.com ".parse::<Command>(), Ok(Command::AllowAdd("example.com".to_string())));
        assert_eq!("allow".parse::<Command>(), Ok(Command::AllowShow));
        assert_eq!("allow rm substack.com".parse::<Command>(), Ok(Command::AllowRemove("substack.com".to_string())));
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!("".parse::<Command>(), Err(CommandParseError::Empty));
        assert_eq!("model".parse::<Command>(), Err(CommandParseError::MissingArgument("model")));
        assert_eq!("monitor maybe".parse::<Command>(), Err(CommandParseError::InvalidSwitch("maybe".to_string())));
        assert!(matches!("fly".parse::<Command>(), Err(CommandParseError::Unknown(_))));
    }
}
