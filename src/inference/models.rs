//! Clipboard Ollama - Inference data models
//!
//! Request/result types and the Ollama wire format

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Failure taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection refused, timeout, DNS failure
    Network,
    /// Non-200 status
    Http,
    /// Unparseable success body
    Protocol,
    /// Clipboard OS call failed
    ClipboardRead,
    /// No model selected or empty content
    Config,
}

impl ErrorKind {
    /// Prefix used in the response area
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Network => "Network Error",
            ErrorKind::Http => "API Error",
            ErrorKind::Protocol => "Unexpected Error",
            ErrorKind::ClipboardRead => "Clipboard Error",
            ErrorKind::Config => "Configuration Error",
        }
    }
}

/// Outcome of one chat exchange
#[derive(Debug, Clone, PartialEq)]
pub enum ChatResult {
    Success { text: String, elapsed_ms: u64 },
    Failure { kind: ErrorKind, detail: String },
}

impl ChatResult {
    pub fn failure(kind: ErrorKind, detail: impl Into<String>) -> Self {
        ChatResult::Failure {
            kind,
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ChatResult::Success { .. })
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            ChatResult::Success { .. } => None,
            ChatResult::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl fmt::Display for ChatResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatResult::Success { text, .. } => f.write_str(text),
            ChatResult::Failure { kind, detail } => write!(f, "{}: {}", kind.label(), detail),
        }
    }
}

/// Pre-flight validation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("Clipboard is empty or contains only whitespace.")]
    EmptyContent,
    #[error("No model selected.")]
    NoModel,
}

impl RequestError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Config
    }
}

/// A single validated chat request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// Correlates log lines of one exchange
    id: Uuid,
    model: String,
    user_text: String,
}

impl ChatRequest {
    /// Validate and build; the text is trimmed
    pub fn new(model: &str, text: &str) -> Result<Self, RequestError> {
        let user_text = text.trim();
        if user_text.is_empty() {
            return Err(RequestError::EmptyContent);
        }
        let model = model.trim();
        if model.is_empty() {
            return Err(RequestError::NoModel);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            model: model.to_string(),
            user_text: user_text.to_string(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    pub(crate) fn payload(&self) -> ChatPayload<'_> {
        ChatPayload {
            model: &self.model,
            messages: vec![WireMessage {
                role: "user",
                content: &self.user_text,
            }],
            stream: false,
        }
    }
}

/// Result of the connectivity probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Connected,
    Disconnected,
    /// Server answered with a non-200 status
    ErrorStatus(u16),
}

impl ServerStatus {
    pub fn label(&self) -> String {
        match self {
            ServerStatus::Connected => "Connected to Ollama".to_string(),
            ServerStatus::Disconnected => "Ollama Disconnected".to_string(),
            ServerStatus::ErrorStatus(code) => format!("Ollama Error (HTTP {})", code),
        }
    }
}

// -- Wire format --

#[derive(Debug, Serialize)]
pub(crate) struct ChatPayload<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseBody {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelTag {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_validation() {
        assert_eq!(ChatRequest::new("gemma3:1b", " \n "), Err(RequestError::EmptyContent));
        assert_eq!(ChatRequest::new("  ", "hello"), Err(RequestError::NoModel));
        assert_eq!(RequestError::NoModel.kind().label(), "Configuration Error");

        let request = ChatRequest::new("gemma3:1b", "  hello\n").unwrap();
        assert_eq!(request.user_text(), "hello");
        assert_eq!(request.model(), "gemma3:1b");
        assert_ne!(request.id(), ChatRequest::new("gemma3:1b", "hello").unwrap().id());
    }

    #[test]
    fn payload_shape() {
        let request = ChatRequest::new("gemma3:1b", "hello").unwrap();
        let json = serde_json::to_value(request.payload()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "gemma3:1b",
                "messages": [{"role": "user", "content": "hello"}],
                "stream": false
            })
        );
    }

    #[test]
    fn failure_display() {
        let result = ChatResult::failure(ErrorKind::Http, "HTTP 500");
        assert_eq!(result.to_string(), "API Error: HTTP 500");
        assert_eq!(result.error_kind(), Some(ErrorKind::Http));
        assert!(!result.is_success());
    }
}
