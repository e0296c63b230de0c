//! Clipboard Ollama - Ollama HTTP client
//!
//! One non-streaming chat exchange per call, plus model discovery and a
//! connectivity probe

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::Level;
use reqwest::{Client, StatusCode};

use super::models::{
    ChatRequest, ChatResponseBody, ChatResult, ErrorKind, ServerStatus, TagsResponse,
};
use crate::clipboard::preview;
use crate::config::Settings;
use crate::storage::SessionLog;

const CHAT_ROUTE: &str = "/api/chat";
const TAGS_ROUTE: &str = "/api/tags";
const LOG_PREVIEW_LENGTH: usize = 200;

/// Client for a local Ollama server
#[derive(Clone)]
pub struct OllamaClient {
    http: Client,
    base_url: String,
    chat_timeout: Duration,
    models_timeout: Duration,
    session_log: Option<Arc<SessionLog>>,
}

impl OllamaClient {
    /// Client with the default timeouts (60s chat, 5s listing)
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!("clipboard-ollama/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            chat_timeout: Duration::from_secs(60),
            models_timeout: Duration::from_secs(5),
            session_log: None,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        Ok(Self::new(&settings.ollama_url)?.with_timeouts(
            Duration::from_secs(settings.request_timeout_secs),
            Duration::from_secs(settings.models_timeout_secs),
        ))
    }

    pub fn with_timeouts(mut self, chat: Duration, models: Duration) -> Self {
        self.chat_timeout = chat;
        self.models_timeout = models;
        self
    }

    pub fn with_session_log(mut self, session_log: Arc<SessionLog>) -> Self {
        self.session_log = Some(session_log);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one chat request and wait for the full reply
    ///
    /// Every outcome is recorded in the session log.
    pub async fn send(&self, request: &ChatRequest) -> ChatResult {
        let content = request.user_text();
        self.record(Level::Info, "=== NEW OLLAMA REQUEST ===");
        self.record(Level::Info, &format!("Request id: {}", request.id()));
        self.record(Level::Info, &format!("Model: {}", request.model()));
        self.record(Level::Info, &format!("Content length: {} characters", content.chars().count()));
        self.record(
            Level::Info,
            &format!("Content preview: '{}'", preview(content, LOG_PREVIEW_LENGTH)),
        );

        let started = Instant::now();
        let outcome = self.exchange(request).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(text) => {
                self.record(
                    Level::Info,
                    &format!("Response received in {:.1}s", elapsed.as_secs_f64()),
                );
                self.record(
                    Level::Info,
                    &format!("Response length: {} characters", text.chars().count()),
                );
                self.record_transcript(request, &text, elapsed);
                ChatResult::Success {
                    text,
                    elapsed_ms: elapsed.as_millis() as u64,
                }
            }
            Err((kind, detail)) => {
                self.record(Level::Error, &format!("Ollama request failed: {}: {}", kind.label(), detail));
                self.record(Level::Error, &format!("Elapsed time: {:.1}s", elapsed.as_secs_f64()));
                ChatResult::Failure { kind, detail }
            }
        }
    }

    async fn exchange(&self, request: &ChatRequest) -> Result<String, (ErrorKind, String)> {
        let url = format!("{}{}", self.base_url, CHAT_ROUTE);
        log::debug!("Sending request to {}", url);

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&request.payload())
            .timeout(self.chat_timeout)
            .send()
            .await
            .map_err(|e| (ErrorKind::Network, self.describe(&e, self.chat_timeout)))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            self.record(Level::Error, &format!("Response content: {}", body));
            return Err((ErrorKind::Http, format!("HTTP {}", status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| (ErrorKind::Network, self.describe(&e, self.chat_timeout)))?;

        serde_json::from_str::<ChatResponseBody>(&body)
            .map(|parsed| parsed.message.content)
            .map_err(|e| (ErrorKind::Protocol, format!("Malformed response body: {}", e)))
    }

    /// Names of the models the server has installed; empty on any failure
    pub async fn list_models(&self) -> Vec<String> {
        let url = format!("{}{}", self.base_url, TAGS_ROUTE);
        let response = match self.http.get(&url).timeout(self.models_timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Failed to list models: {}", self.describe(&e, self.models_timeout));
                return Vec::new();
            }
        };

        if response.status() != StatusCode::OK {
            log::warn!("Failed to list models: HTTP {}", response.status().as_u16());
            return Vec::new();
        }

        match response.json::<TagsResponse>().await {
            Ok(tags) => tags.models.into_iter().map(|m| m.name).collect(),
            Err(e) => {
                log::warn!("Failed to parse model list: {}", e);
                Vec::new()
            }
        }
    }

    /// Connectivity probe against the model listing route
    pub async fn ping(&self) -> ServerStatus {
        let url = format!("{}{}", self.base_url, TAGS_ROUTE);
        match self.http.get(&url).timeout(self.models_timeout).send().await {
            Ok(response) if response.status() == StatusCode::OK => ServerStatus::Connected,
            Ok(response) => ServerStatus::ErrorStatus(response.status().as_u16()),
            Err(e) => {
                log::debug!("Ollama probe failed: {}", e);
                ServerStatus::Disconnected
            }
        }
    }

    fn describe(&self, error: &reqwest::Error, timeout: Duration) -> String {
        if error.is_timeout() {
            format!("request timed out after {:.3}s", timeout.as_secs_f64())
        } else if error.is_connect() {
            format!("cannot connect to {}: {}", self.base_url, error)
        } else {
            error.to_string()
        }
    }

    fn record(&self, level: Level, message: &str) {
        match &self.session_log {
            Some(session_log) => session_log.activity(level, message),
            None => log::log!(level, "{}", message),
        }
    }

    fn record_transcript(&self, request: &ChatRequest, reply: &str, elapsed: Duration) {
        if let Some(session_log) = &self.session_log {
            let content = request.user_text();
            session_log.transcript(&[
                "=== REQUEST ===".to_string(),
                format!("Model: {}", request.model()),
                format!("User Input ({} chars): {}", content.chars().count(), content),
                format!("=== RESPONSE ({:.1}s) ===", elapsed.as_secs_f64()),
                format!("Assistant ({} chars): {}", reply.chars().count(), reply),
                "=".repeat(50),
            ]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use mockito::{Matcher, Server};
    use std::fs;

    const UNREACHABLE: &str = "http://127.0.0.1:1";

    fn client(base_url: &str) -> OllamaClient {
        OllamaClient::new(base_url).unwrap()
    }

    fn request(text: &str) -> ChatRequest {
        ChatRequest::new("gemma3:1b", text).unwrap()
    }

    #[tokio::test]
    async fn send_returns_assistant_text_on_200() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "model": "gemma3:1b",
                "messages": [{"role": "user", "content": "hello"}],
                "stream": false
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"model":"gemma3:1b","message":{"role":"assistant","content":"hi there"},"done":true}"#)
            .create_async()
            .await;

        let result = client(&server.url()).send(&request("hello")).await;

        mock.assert_async().await;
        match result {
            ChatResult::Success { text, .. } => assert_eq!(text, "hi there"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_200_is_http_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .with_status(500)
            .with_body("model not found")
            .create_async()
            .await;

        let result = client(&server.url()).send(&request("hello")).await;
        assert_eq!(result, ChatResult::failure(ErrorKind::Http, "HTTP 500"));
    }

    #[tokio::test]
    async fn malformed_body_is_protocol_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body(r#"{"unexpected": true}"#)
            .create_async()
            .await;

        let result = client(&server.url()).send(&request("hello")).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::Protocol));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let result = client(UNREACHABLE).send(&request("hello")).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::Network));
    }

    #[tokio::test]
    async fn stalled_server_times_out_as_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold the connection without ever answering
        let stall = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let result = client(&format!("http://{}", addr))
            .with_timeouts(Duration::from_millis(300), Duration::from_secs(5))
            .send(&request("hello"))
            .await;
        stall.abort();

        assert_eq!(
            result,
            ChatResult::failure(ErrorKind::Network, "request timed out after 0.300s")
        );
    }

    #[tokio::test]
    async fn model_listing_uses_its_own_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let stall = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let started = Instant::now();
        let models = client(&format!("http://{}", addr))
            .with_timeouts(Duration::from_secs(60), Duration::from_millis(200))
            .list_models()
            .await;
        stall.abort();

        assert!(models.is_empty());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn every_outcome_is_recorded_in_session_log() {
        let dir = tempfile::tempdir().unwrap();
        let session_log = Arc::new(SessionLog::open(dir.path()).unwrap());
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body(r#"{"message":{"content":"hi there"}}"#)
            .create_async()
            .await;

        let working = client(&server.url()).with_session_log(session_log.clone());
        working.send(&request("hello")).await;

        let failing = client(UNREACHABLE).with_session_log(session_log.clone());
        failing.send(&request("second")).await;

        let activity = fs::read_to_string(session_log.activity_file(Local::now())).unwrap();
        assert_eq!(activity.matches("=== NEW OLLAMA REQUEST ===").count(), 2);
        assert!(activity.contains("Content preview: 'hello'"));
        assert!(activity.contains("| ERROR | Ollama request failed: Network Error"));

        let transcript = fs::read_to_string(session_log.transcript_file(Local::now())).unwrap();
        assert!(transcript.contains("User Input (5 chars): hello"));
        assert!(transcript.contains("Assistant (8 chars): hi there"));
        assert!(!transcript.contains("second"));
    }

    #[tokio::test]
    async fn list_models_reads_tag_names() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/tags")
            .with_status(200)
            .with_body(r#"{"models":[{"name":"gemma3:1b","size":1},{"name":"llama3.2:3b"}]}"#)
            .create_async()
            .await;

        let models = client(&server.url()).list_models().await;
        assert_eq!(models, vec!["gemma3:1b", "llama3.2:3b"]);
    }

    #[tokio::test]
    async fn list_models_is_empty_on_failure() {
        let mut server = Server::new_async().await;
        server.mock("GET", "/api/tags").with_status(500).create_async().await;

        assert!(client(&server.url()).list_models().await.is_empty());
        assert!(client(UNREACHABLE).list_models().await.is_empty());
    }

    #[tokio::test]
    async fn ping_maps_status() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/tags")
            .with_status(200)
            .with_body(r#"{"models":[]}"#)
            .create_async()
            .await;
        assert_eq!(client(&server.url()).ping().await, ServerStatus::Connected);

        let mut failing = Server::new_async().await;
        failing.mock("GET", "/api/tags").with_status(503).create_async().await;
        assert_eq!(
            client(&failing.url()).ping().await,
            ServerStatus::ErrorStatus(503)
        );

        assert_eq!(client(UNREACHABLE).ping().await, ServerStatus::Disconnected);
    }

    #[test]
    fn trailing_slash_is_dropped() {
        assert_eq!(client("http://localhost:11434/").base_url(), "http://localhost:11434");
    }
}
