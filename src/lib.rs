//! Clipboard Ollama - Send clipboard text to a local LLM
//!
//! Watches the system clipboard, shows its content, and on request (command
//! or global hotkey) forwards the text to a local Ollama server and shows
//! the reply.

pub mod clipboard;
pub mod commands;
pub mod config;
pub mod hotkey;
pub mod inference;
pub mod storage;
pub mod ui;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::Level;

use clipboard::{ClipboardMonitor, ClipboardSource, SystemClipboard};
use config::{AllowList, Paths, Settings};
use hotkey::{GlobalHotkeyRegistrar, HotkeyRegistrar};
use inference::OllamaClient;
use storage::SessionLog;
use ui::{ConsoleFrontend, Shell, ShellDeps, UiEvent};

/// Startup error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings error: {0}")]
    Settings(#[from] config::SettingsError),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Command line options; flags override the settings file
#[derive(Debug, Default, Parser)]
#[command(name = "clipboard-ollama", version, about = "Send clipboard text to a local Ollama model")]
pub struct Cli {
    /// Directory for settings, allow-list and logs
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Ollama base URL
    #[arg(long)]
    pub url: Option<String>,
    /// Preferred model
    #[arg(long)]
    pub model: Option<String>,
    /// Do not register the global hotkey
    #[arg(long)]
    pub no_hotkey: bool,
    /// Start with clipboard monitoring paused
    #[arg(long)]
    pub no_monitor: bool,
    /// Send allow-listed clipboard changes automatically
    #[arg(long)]
    pub auto_dispatch: bool,
}

impl Cli {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(url) = &self.url {
            settings.ollama_url = url.clone();
        }
        if let Some(model) = &self.model {
            settings.default_model = model.clone();
        }
        if self.no_hotkey {
            settings.hotkey_enabled = false;
        }
        if self.no_monitor {
            settings.auto_monitor = false;
        }
        if self.auto_dispatch {
            settings.auto_dispatch = true;
        }
    }
}

/// Application main entry point
pub fn run(cli: Cli) -> Result<(), AppError> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Clipboard Ollama starting...");

    let paths = Paths::new(cli.data_dir.clone().unwrap_or_else(Paths::default_data_dir));
    fs::create_dir_all(paths.data_dir())?;
    log::info!("Data directory: {:?}", paths.data_dir());

    // Command line overrides last for this run only
    let saved_settings = Settings::load_or_default(&paths.settings_file());
    let mut settings = saved_settings.clone();
    cli.apply(&mut settings);

    let session_log = Arc::new(SessionLog::open(paths.logs_dir())?);
    session_log.activity(Level::Info, "=== Clipboard to Ollama App Started ===");
    session_log.activity(Level::Info, &format!("Ollama URL: {}", settings.ollama_url));
    session_log.activity(Level::Info, &format!("Default Model: {}", settings.default_model));
    log::info!("Logging enabled - logs saved to {:?}", session_log.dir());

    let allow_list = match AllowList::load(&paths.allow_list_file()) {
        Ok(list) => list,
        Err(e) => {
            log::warn!("Error loading domains: {}", e);
            AllowList::new()
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("ollama-worker")
        .enable_all()
        .build()?;

    let (ui, rx) = ui::channel();
    let source: Arc<dyn ClipboardSource> = Arc::new(SystemClipboard);

    // Start clipboard monitoring
    let monitor = ClipboardMonitor::new(settings.poll_interval_ms, Arc::clone(&source));
    if !settings.auto_monitor {
        monitor.pause();
    }
    let monitor_ui = ui.clone();
    monitor.start(move |snapshot| {
        monitor_ui.post(UiEvent::ClipboardChanged(snapshot));
    });

    let hotkeys: Option<Box<dyn HotkeyRegistrar>> = match GlobalHotkeyRegistrar::new() {
        Ok(registrar) => Some(Box::new(registrar)),
        Err(e) => {
            log::warn!("Global hotkey unavailable: {}", e);
            None
        }
    };

    ui::console::spawn_stdin_reader(ui.clone());

    let mut shell = Shell::new(ShellDeps {
        client: OllamaClient::from_settings(&settings)?.with_session_log(Arc::clone(&session_log)),
        frontend: Box::new(ConsoleFrontend::new(settings.preview_length)),
        settings,
        saved_settings,
        paths,
        allow_list,
        clipboard: source,
        monitor: Some(monitor),
        hotkeys,
        runtime: runtime.handle().clone(),
        ui,
    });

    println!("{}", commands::handlers::HELP);
    shell.start();
    shell.run(rx);

    session_log.activity(Level::Info, "=== Clipboard to Ollama App Stopped ===");
    // In-flight requests are abandoned
    runtime.shutdown_background();
    Ok(())
}
