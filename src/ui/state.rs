//! Clipboard Ollama - View state
//!
//! What the frontend shows; owned and mutated by the UI thread only

/// Severity of a status line or notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "ℹ️",
            NoticeLevel::Success => "✅",
            NoticeLevel::Warning => "⚠️",
            NoticeLevel::Error => "❌",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Clipboard content area
    pub clipboard_text: String,
    pub char_count: usize,
    /// Response area
    pub response_text: String,
    /// "Response at HH:MM:SS (1.2s)"
    pub response_time: String,
    pub status: String,
    pub status_level: NoticeLevel,
    /// Send trigger enabled; false while a request is in flight
    pub send_enabled: bool,
    pub auto_monitor: bool,
    pub hotkey_enabled: bool,
    pub models: Vec<String>,
    pub selected_model: String,
}

impl ViewState {
    pub fn new(selected_model: &str) -> Self {
        Self {
            clipboard_text: String::new(),
            char_count: 0,
            response_text: String::new(),
            response_time: String::new(),
            status: "Starting...".to_string(),
            status_level: NoticeLevel::Info,
            send_enabled: true,
            auto_monitor: false,
            hotkey_enabled: false,
            models: Vec::new(),
            selected_model: selected_model.to_string(),
        }
    }

    pub fn set_clipboard(&mut self, text: String) {
        self.char_count = text.chars().count();
        self.clipboard_text = text;
    }

    pub fn set_status(&mut self, status: impl Into<String>, level: NoticeLevel) {
        self.status = status.into();
        self.status_level = level;
    }

    pub fn clear_response(&mut self) {
        self.response_text.clear();
        self.response_time.clear();
    }

    pub fn send_label(&self) -> &'static str {
        if self.send_enabled {
            "🚀 Send to Ollama"
        } else {
            "⏳ Processing..."
        }
    }
}
