//! Clipboard Ollama - Inference module
//!
//! Talks to the local Ollama server

pub mod client;
pub mod models;

pub use client::OllamaClient;
pub use models::{ChatRequest, ChatResult, ErrorKind, RequestError, ServerStatus};
