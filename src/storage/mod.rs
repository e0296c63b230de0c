//! Clipboard Ollama - Storage module
//!
//! In-memory interaction history and on-disk session logs

pub mod history;
pub mod session_log;

pub use history::{HistoryEntry, HistoryLog};
pub use session_log::SessionLog;
