//! Clipboard Ollama - Console frontend
//!
//! Prints view changes to stdout and turns stdin lines into commands

use std::io::{self, BufRead};
use std::thread;

use super::state::{NoticeLevel, ViewState};
use super::{Frontend, UiEvent, UiHandle};
use crate::clipboard::preview;
use crate::commands::Command;

/// Prints only what changed since the previous render
pub struct ConsoleFrontend {
    last: Option<ViewState>,
    preview_length: usize,
}

impl ConsoleFrontend {
    pub fn new(preview_length: usize) -> Self {
        Self {
            last: None,
            preview_length,
        }
    }
}

impl Frontend for ConsoleFrontend {
    fn render(&mut self, view: &ViewState) {
        let last = self.last.as_ref();

        if last.map_or(true, |l| l.status != view.status) {
            println!("{} Status: {}", view.status_level.icon(), view.status);
        }
        if last.map_or(true, |l| l.selected_model != view.selected_model || l.models != view.models) {
            if view.models.is_empty() {
                println!("🧠 Model: {}", view.selected_model);
            } else {
                println!("🧠 Model: {} (available: {})", view.selected_model, view.models.join(", "));
            }
        }
        if last.map_or(true, |l| l.clipboard_text != view.clipboard_text) {
            println!(
                "📋 Clipboard ({} characters): {}",
                view.char_count,
                preview(view.clipboard_text.trim(), self.preview_length)
            );
        }
        if last.map_or(false, |l| l.send_enabled != view.send_enabled) {
            println!("{}", view.send_label());
        }
        if last.map_or(false, |l| l.auto_monitor != view.auto_monitor || l.hotkey_enabled != view.hotkey_enabled) {
            println!(
                "👁️ Auto-monitor: {}  ⌨️ Hotkey: {}",
                on_off(view.auto_monitor),
                on_off(view.hotkey_enabled)
            );
        }
        if last.map_or(true, |l| l.response_text != view.response_text) && !view.response_text.is_empty() {
            println!("🤖 Ollama Response {}", view.response_time);
            println!("{}", "=".repeat(60));
            println!("{}", view.response_text);
            println!("{}", "=".repeat(60));
        }

        self.last = Some(view.clone());
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Warning | NoticeLevel::Error => eprintln!("{} {}", level.icon(), message),
            _ => println!("{} {}", level.icon(), message),
        }
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Read commands from stdin on a background thread
///
/// End of input quits the application.
pub fn spawn_stdin_reader(ui: UiHandle) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::error!("Failed to read stdin: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let event = match line.parse::<Command>() {
                Ok(command) => UiEvent::Command(command),
                Err(e) => UiEvent::InputError(e.to_string()),
            };
            if !ui.post(event) {
                return;
            }
        }
        ui.post(UiEvent::Quit);
    });
}
