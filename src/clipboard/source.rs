//! Clipboard Ollama - Clipboard source
//!
//! Read-only access to the system clipboard's text representation

use arboard::Clipboard;

/// Clipboard read error
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Failed to access clipboard: {0}")]
    Access(String),
    #[error("Failed to read clipboard text: {0}")]
    Read(String),
}

/// Anything that can produce the current clipboard text
pub trait ClipboardSource: Send + Sync {
    fn read_text(&self) -> Result<String, ClipboardError>;
}

/// System clipboard through arboard
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSource for SystemClipboard {
    fn read_text(&self) -> Result<String, ClipboardError> {
        // New instance per read so we always see the latest owner's data
        let mut clipboard = Clipboard::new().map_err(|e| ClipboardError::Access(e.to_string()))?;

        match clipboard.get_text() {
            Ok(text) => Ok(text),
            // Empty clipboard or non-text content reads as empty text
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(ClipboardError::Read(e.to_string())),
        }
    }
}
