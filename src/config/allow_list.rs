//! Clipboard Ollama - Allow-list (domain filter)
//!
//! Case-insensitive substring patterns gating hotkey and automatic dispatch

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Allow-list error type
#[derive(Debug, thiserror::Error)]
pub enum AllowListError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Set of normalized (trimmed, lower-cased) patterns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    patterns: BTreeSet<String>,
}

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from newline-separated text, skipping blank lines
    pub fn from_lines(text: &str) -> Self {
        let mut list = Self::new();
        for line in text.lines() {
            list.add(line);
        }
        list
    }

    /// Add a pattern; returns false for blanks and duplicates
    pub fn add(&mut self, pattern: &str) -> bool {
        let normalized = normalize(pattern);
        if normalized.is_empty() {
            return false;
        }
        self.patterns.insert(normalized)
    }

    pub fn remove(&mut self, pattern: &str) -> bool {
        self.patterns.remove(&normalize(pattern))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    /// Whether `content` is eligible for dispatch
    ///
    /// An empty list accepts everything.
    pub fn matches(&self, content: &str) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        let content = content.to_lowercase();
        self.patterns.iter().any(|p| content.contains(p.as_str()))
    }

    /// Load from file; a missing file is an empty list
    pub fn load(path: &Path) -> Result<Self, AllowListError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        Ok(Self::from_lines(&fs::read_to_string(path)?))
    }

    /// Overwrite the file with one pattern per line
    pub fn save(&self, path: &Path) -> Result<(), AllowListError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body: Vec<&str> = self.iter().collect();
        fs::write(path, body.join("\n"))?;
        Ok(())
    }
}

fn normalize(pattern: &str) -> String {
    pattern.trim().to_lowercase()
}
