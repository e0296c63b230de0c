//! Clipboard Ollama - Clipboard module
//!
//! Provides clipboard reading and change monitoring

pub mod models;
pub mod monitor;
pub mod source;

pub use models::{has_meaningful_content, preview, ClipboardSnapshot};
pub use monitor::ClipboardMonitor;
pub use source::{ClipboardError, ClipboardSource, SystemClipboard};
