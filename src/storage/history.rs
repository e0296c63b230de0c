//! Clipboard Ollama - Interaction history
//!
//! Append-only record of request/response pairs shown in the history view

use chrono::{DateTime, Local};

use crate::clipboard::preview;

/// User text is cut to this many characters for display
pub const USER_PREVIEW_LENGTH: usize = 200;

/// One completed exchange
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    /// Truncated user text
    pub user_text: String,
    pub assistant_text: String,
}

impl HistoryEntry {
    pub fn new(user_text: &str, assistant_text: String) -> Self {
        Self {
            timestamp: Local::now(),
            user_text: preview(user_text, USER_PREVIEW_LENGTH),
            assistant_text,
        }
    }

    /// Render as shown in the history view
    pub fn render(&self) -> String {
        format!(
            "[{}]\nUser: {}\n\nAssistant: {}\n\n{}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.user_text,
            self.assistant_text,
            "=".repeat(50)
        )
    }
}

/// Append-only sequence, emptied only by `clear`
#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(HistoryEntry::render)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_user_text_is_truncated() {
        let long = "x".repeat(250);
        let entry = HistoryEntry::new(&long, "ok".to_string());
        assert_eq!(entry.user_text.chars().count(), USER_PREVIEW_LENGTH + 3);
        assert!(entry.user_text.ends_with("..."));

        let short = HistoryEntry::new("hello", "hi there".to_string());
        assert_eq!(short.user_text, "hello");
    }

    #[test]
    fn push_appends_and_clear_empties() {
        let mut history = HistoryLog::new();
        history.push(HistoryEntry::new("a", "1".to_string()));
        history.push(HistoryEntry::new("b", "2".to_string()));

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[1].user_text, "b");
        assert!(history.render().contains("User: a\n\nAssistant: 1"));

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.render(), "");
    }
}
