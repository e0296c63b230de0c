//! Clipboard Ollama - Configuration module
//!
//! User settings, allow-list and on-disk locations

pub mod allow_list;
pub mod settings;

use std::path::{Path, PathBuf};

pub use allow_list::{AllowList, AllowListError};
pub use settings::{Settings, SettingsError};

/// File locations under the data directory
#[derive(Debug, Clone)]
pub struct Paths {
    pub data_dir: PathBuf,
}

impl Paths {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Platform data directory, or the working directory when unknown
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("clipboard-ollama"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }

    pub fn allow_list_file(&self) -> PathBuf {
        self.data_dir.join("allowed_domains.txt")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
