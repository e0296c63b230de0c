//! Clipboard Ollama - Command handlers
//!
//! Runs user commands against the shell on the UI thread

use crate::ui::{Shell, Trigger};

use super::Command;

pub const HELP: &str = "\
Commands:
  send | s              send the displayed clipboard text
  refresh | r           re-read the clipboard
  clear                 clear the response area
  monitor on|off        toggle automatic clipboard monitoring
  hotkey on|off         toggle the global hotkey
  models                rediscover installed models
  model <name>          select a model
  status                check the Ollama connection
  history [clear]       show or clear the interaction history
  allow [list]          show allowed domains
  allow add|rm <p>      edit allowed domains
  allow save|load       write or re-read the allowed domains file
  help                  this text
  quit                  exit";

/// Command execution result
#[derive(Debug)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Execute one command; the message in `data` is shown to the user
pub fn execute(shell: &mut Shell, command: Command) -> CommandResult<String> {
    match command {
        Command::Send => {
            shell.dispatch(Trigger::Manual);
            CommandResult::ok(String::new())
        }
        Command::Refresh => {
            shell.refresh_clipboard();
            CommandResult::ok(String::new())
        }
        Command::ClearResponse => {
            shell.clear_response();
            CommandResult::ok("Response cleared".to_string())
        }
        Command::Monitor(enabled) => {
            shell.set_monitoring(enabled);
            CommandResult::ok(format!("Monitoring {}", if enabled { "enabled" } else { "disabled" }))
        }
        Command::Hotkey(enabled) => match shell.set_hotkey(enabled) {
            Ok(()) => CommandResult::ok(format!(
                "Global hotkey {}",
                if enabled { "enabled" } else { "disabled" }
            )),
            Err(e) => CommandResult::err(e),
        },
        Command::Models => {
            shell.load_models();
            CommandResult::ok("Loading models...".to_string())
        }
        Command::SelectModel(name) => match shell.select_model(&name) {
            Ok(()) => CommandResult::ok(format!("Model: {}", name.trim())),
            Err(e) => CommandResult::err(e),
        },
        Command::Status => {
            shell.probe_status();
            CommandResult::ok("Checking Ollama status...".to_string())
        }
        Command::History => {
            let history = shell.history();
            if history.is_empty() {
                CommandResult::ok("History is empty".to_string())
            } else {
                CommandResult::ok(history.render())
            }
        }
        Command::ClearHistory => {
            shell.clear_history();
            CommandResult::ok("History cleared".to_string())
        }
        Command::AllowShow => {
            let list = shell.allow_list();
            if list.is_empty() {
                CommandResult::ok("No allowed domains (everything passes)".to_string())
            } else {
                CommandResult::ok(list.iter().collect::<Vec<_>>().join("\n"))
            }
        }
        Command::AllowAdd(pattern) => {
            if shell.allow_list_mut().add(&pattern) {
                CommandResult::ok(format!("Added '{}'", pattern.trim().to_lowercase()))
            } else {
                CommandResult::err(format!("'{}' is already allowed", pattern.trim()))
            }
        }
        Command::AllowRemove(pattern) => {
            if shell.allow_list_mut().remove(&pattern) {
                CommandResult::ok(format!("Removed '{}'", pattern.trim().to_lowercase()))
            } else {
                CommandResult::err(format!("'{}' is not in the allow-list", pattern.trim()))
            }
        }
        Command::AllowSave => match shell.save_allow_list() {
            Ok(count) => CommandResult::ok(format!("Saved {} domains", count)),
            Err(e) => CommandResult::err(e),
        },
        Command::AllowLoad => match shell.load_allow_list() {
            Ok(count) => CommandResult::ok(format!("Loaded {} domains", count)),
            Err(e) => CommandResult::err(e),
        },
        Command::Help => CommandResult::ok(HELP.to_string()),
        // Handled by the shell loop before reaching here
        Command::Quit => CommandResult::ok(String::new()),
    }
}
