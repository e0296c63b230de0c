//! Clipboard Ollama - User settings module
//!
//! Manages application user configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Settings error type
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Inference server base URL
    pub ollama_url: String,
    /// Model used when discovery fails or lists nothing better
    pub default_model: String,
    /// Poll the clipboard automatically
    pub auto_monitor: bool,
    /// Dispatch allow-listed clipboard changes without a trigger
    pub auto_dispatch: bool,
    /// Global hotkey enabled
    pub hotkey_enabled: bool,
    /// Global hotkey
    pub hotkey: String,
    /// Poll interval
    pub poll_interval_ms: u64,
    /// Chat request timeout
    pub request_timeout_secs: u64,
    /// Model listing and status probe timeout
    pub models_timeout_secs: u64,
    /// Preview text length
    pub preview_length: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            default_model: "gemma3:1b".to_string(),
            auto_monitor: true,
            auto_dispatch: false,
            hotkey_enabled: true,
            hotkey: "CmdOrCtrl+Shift+KeyO".to_string(),
            poll_interval_ms: 1000,
            request_timeout_secs: 60,
            models_timeout_secs: 5,
            preview_length: 200,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    ///
    /// A missing file yields defaults; fields absent from the file keep
    /// their defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to load settings from {:?}: {}, using defaults", path, e);
                Settings::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.request_timeout_secs, 60);
        assert_eq!(settings.poll_interval_ms, 1000);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"default_model": "llama3.2:3b", "auto_monitor": false}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.default_model, "llama3.2:3b");
        assert!(!settings.auto_monitor);
        assert_eq!(settings.ollama_url, "http://localhost:11434");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            hotkey_enabled: false,
            auto_dispatch: true,
            ..Settings::default()
        };

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn garbage_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(Settings::load(&path).is_err());
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }
}
