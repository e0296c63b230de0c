//! Clipboard Ollama - UI shell
//!
//! Everything that touches view state runs on one thread. Other threads
//! hand work to it by posting a `UiEvent` through a `UiHandle`.

pub mod console;
pub mod shell;
pub mod state;

use std::sync::mpsc::{self, Receiver, Sender};

use crate::clipboard::ClipboardSnapshot;
use crate::commands::Command;
use crate::inference::{ChatRequest, ChatResult, ServerStatus};

pub use console::ConsoleFrontend;
pub use shell::{Shell, ShellDeps, Trigger};
pub use state::{NoticeLevel, ViewState};

/// Work marshaled onto the UI thread
#[derive(Debug)]
pub enum UiEvent {
    /// Poller saw new clipboard text
    ClipboardChanged(ClipboardSnapshot),
    /// Global hotkey fired
    HotkeyPressed,
    /// An inference call resolved
    DispatchFinished { request: ChatRequest, result: ChatResult },
    ModelsLoaded(Vec<String>),
    StatusProbed(ServerStatus),
    /// User command from the frontend
    Command(Command),
    /// Frontend input that could not be understood
    InputError(String),
    Quit,
}

/// Cloneable sender into the UI thread's queue
#[derive(Debug, Clone)]
pub struct UiHandle {
    tx: Sender<UiEvent>,
}

impl UiHandle {
    /// Queue an event; false once the UI thread has gone away
    pub fn post(&self, event: UiEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Create the UI queue
pub fn channel() -> (UiHandle, Receiver<UiEvent>) {
    let (tx, rx) = mpsc::channel();
    (UiHandle { tx }, rx)
}

/// Renders view state and shows notices
pub trait Frontend {
    fn render(&mut self, view: &ViewState);
    fn notify(&mut self, level: NoticeLevel, message: &str);
}
