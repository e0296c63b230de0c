//! Clipboard Ollama - Clipboard data models
//!
//! Defines the snapshot captured on each poll tick

use chrono::{DateTime, Local};

/// One captured read of the clipboard's text content
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardSnapshot {
    /// Plain text content
    pub text: String,
    /// Capture time
    pub captured_at: DateTime<Local>,
}

impl ClipboardSnapshot {
    /// Capture text now
    pub fn new(text: String) -> Self {
        Self {
            text,
            captured_at: Local::now(),
        }
    }

    /// Whether the text carries anything besides whitespace
    pub fn has_content(&self) -> bool {
        has_meaningful_content(&self.text)
    }

    /// Character count (not bytes)
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Non-empty after trimming
pub fn has_meaningful_content(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Shorten text to `max_len` characters, appending "..." when cut
pub fn preview(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_is_not_content() {
        assert!(!ClipboardSnapshot::new("  \n\t ".to_string()).has_content());
        assert!(!ClipboardSnapshot::new(String::new()).has_content());
        assert!(ClipboardSnapshot::new(" x ".to_string()).has_content());
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        assert_eq!(preview("héllo", 10), "héllo");
        assert_eq!(preview("héllo wörld", 5), "héllo...");
        assert_eq!(ClipboardSnapshot::new("日本語".to_string()).char_count(), 3);
    }
}
