//! Clipboard Ollama - Shell
//!
//! The UI thread's state object: clipboard display, model selection,
//! dispatch bookkeeping, history and allow-list. Background work (polling,
//! hotkey listening, inference calls) reports back through `UiEvent`s.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::runtime::Handle;

use super::state::{NoticeLevel, ViewState};
use super::{Frontend, UiEvent, UiHandle};
use crate::clipboard::{has_meaningful_content, preview, ClipboardMonitor, ClipboardSnapshot, ClipboardSource};
use crate::commands::{self, Command};
use crate::config::{AllowList, Paths, Settings};
use crate::hotkey::{self, HotkeyRegistrar, RegistrationHandle};
use crate::inference::{ChatRequest, ChatResult, ErrorKind, OllamaClient, ServerStatus};
use crate::storage::{HistoryEntry, HistoryLog};

/// Queue wait between platform event pumps
const UI_TICK: Duration = Duration::from_millis(50);

/// Where a dispatch came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Send button / `send` command; uses the displayed text, unfiltered
    Manual,
    /// Global hotkey; reads the clipboard now and applies the allow-list
    Hotkey,
    /// Clipboard change with auto-dispatch on; applies the allow-list
    Auto,
}

/// Collaborators handed to the shell at startup
pub struct ShellDeps {
    /// Effective settings for this run (file plus command line overrides)
    pub settings: Settings,
    /// Settings as stored on disk; toggles are written back through this copy
    pub saved_settings: Settings,
    pub paths: Paths,
    pub allow_list: AllowList,
    pub client: OllamaClient,
    pub clipboard: Arc<dyn ClipboardSource>,
    /// Running poller, if any; paused and resumed by the monitor toggle
    pub monitor: Option<ClipboardMonitor>,
    pub hotkeys: Option<Box<dyn HotkeyRegistrar>>,
    pub frontend: Box<dyn Frontend>,
    pub runtime: Handle,
    pub ui: UiHandle,
}

pub struct Shell {
    settings: Settings,
    saved_settings: Settings,
    paths: Paths,
    allow_list: AllowList,
    client: OllamaClient,
    clipboard: Arc<dyn ClipboardSource>,
    monitor: Option<ClipboardMonitor>,
    hotkeys: Option<Box<dyn HotkeyRegistrar>>,
    hotkey_handle: Option<Box<dyn RegistrationHandle>>,
    frontend: Box<dyn Frontend>,
    runtime: Handle,
    ui: UiHandle,
    view: ViewState,
    history: HistoryLog,
    in_flight: bool,
}

impl Shell {
    pub fn new(deps: ShellDeps) -> Self {
        let mut view = ViewState::new(&deps.settings.default_model);
        view.auto_monitor = deps.settings.auto_monitor;

        Self {
            settings: deps.settings,
            saved_settings: deps.saved_settings,
            paths: deps.paths,
            allow_list: deps.allow_list,
            client: deps.client,
            clipboard: deps.clipboard,
            monitor: deps.monitor,
            hotkeys: deps.hotkeys,
            hotkey_handle: None,
            frontend: deps.frontend,
            runtime: deps.runtime,
            ui: deps.ui,
            view,
            history: HistoryLog::new(),
            in_flight: false,
        }
    }

    /// Initial refresh, server probe, model discovery and hotkey registration
    pub fn start(&mut self) {
        self.refresh_clipboard();
        self.probe_status();
        self.load_models();

        if self.settings.hotkey_enabled {
            if let Err(e) = self.enable_hotkey() {
                self.notify(NoticeLevel::Warning, &e);
            }
        }

        self.render();
    }

    /// Run the UI loop until quit or until every sender is gone
    pub fn run(&mut self, rx: Receiver<UiEvent>) {
        loop {
            match rx.recv_timeout(UI_TICK) {
                Ok(event) => {
                    if !self.handle_event(event) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            hotkey::pump_platform_events();
        }
        self.shutdown();
    }

    /// Apply one event; false means quit
    pub fn handle_event(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::ClipboardChanged(snapshot) => self.on_clipboard_changed(snapshot),
            UiEvent::HotkeyPressed => self.on_hotkey_pressed(),
            UiEvent::DispatchFinished { request, result } => self.on_dispatch_finished(request, result),
            UiEvent::ModelsLoaded(models) => self.on_models_loaded(models),
            UiEvent::StatusProbed(status) => self.on_status_probed(status),
            UiEvent::Command(Command::Quit) | UiEvent::Quit => return false,
            UiEvent::Command(command) => {
                let result = commands::execute(self, command);
                match (result.data, result.error) {
                    (_, Some(error)) => self.notify(NoticeLevel::Error, &error),
                    (Some(message), None) if !message.is_empty() => self.notify(NoticeLevel::Info, &message),
                    _ => {}
                }
            }
            UiEvent::InputError(message) => self.notify(NoticeLevel::Warning, &message),
        }
        self.render();
        true
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether an inference call is outstanding
    pub fn is_dispatching(&self) -> bool {
        self.in_flight
    }

    /// Start one inference call unless one is already in flight
    pub fn dispatch(&mut self, trigger: Trigger) {
        if self.in_flight {
            log::debug!("Dispatch ignored ({:?}): request already in flight", trigger);
            return;
        }

        let content = match trigger {
            Trigger::Manual | Trigger::Auto => self.view.clipboard_text.clone(),
            Trigger::Hotkey => match self.clipboard.read_text() {
                Ok(text) => text,
                Err(e) => {
                    log::error!("Hotkey dispatch failed to read clipboard: {}", e);
                    self.notify(NoticeLevel::Error, &format!("{}: {}", ErrorKind::ClipboardRead.label(), e));
                    return;
                }
            },
        };

        if !has_meaningful_content(&content) {
            self.notify(NoticeLevel::Warning, "Clipboard is empty or contains only whitespace.");
            return;
        }

        if trigger != Trigger::Manual && !self.allow_list.matches(&content) {
            log::info!("{:?} dispatch skipped: content matches no allowed domain", trigger);
            return;
        }

        if trigger == Trigger::Hotkey {
            self.view.set_clipboard(content.clone());
        }

        let request = match ChatRequest::new(&self.view.selected_model, &content) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("{:?} dispatch rejected: {}: {}", trigger, e.kind().label(), e);
                self.notify(NoticeLevel::Warning, &e.to_string());
                return;
            }
        };

        log::info!(
            "Sending to Ollama: {} chars with {} (request {})",
            request.user_text().chars().count(),
            request.model(),
            request.id()
        );
        self.in_flight = true;
        self.view.send_enabled = false;
        self.view.set_status("Sending to Ollama...", NoticeLevel::Info);
        self.render();

        let client = self.client.clone();
        let guard = DispatchGuard {
            ui: self.ui.clone(),
            request,
            result: None,
        };
        self.runtime.spawn(async move {
            let result = client.send(&guard.request).await;
            guard.finish(result);
        });
    }

    /// Read the clipboard into the display
    pub fn refresh_clipboard(&mut self) {
        match self.clipboard.read_text() {
            Ok(text) => {
                log::info!("Clipboard manually refreshed - {} characters", text.chars().count());
                self.view.set_clipboard(text);
            }
            Err(e) => {
                log::error!("Clipboard refresh failed: {}", e);
                self.notify(NoticeLevel::Error, &format!("{}: {}", ErrorKind::ClipboardRead.label(), e));
            }
        }
    }

    pub fn clear_response(&mut self) {
        self.view.clear_response();
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Toggle the poller; turning it on refreshes right away
    pub fn set_monitoring(&mut self, enabled: bool) {
        self.view.auto_monitor = enabled;
        self.settings.auto_monitor = enabled;
        self.saved_settings.auto_monitor = enabled;
        if let Some(monitor) = &self.monitor {
            if enabled {
                monitor.resume();
            } else {
                monitor.pause();
            }
        }
        log::info!("Monitoring {}", if enabled { "enabled" } else { "disabled" });
        if enabled {
            self.refresh_clipboard();
        }
        self.save_settings();
    }

    /// Register or release the global hotkey
    pub fn set_hotkey(&mut self, enabled: bool) -> Result<(), String> {
        if enabled {
            self.enable_hotkey()?;
        } else {
            self.disable_hotkey();
        }
        self.settings.hotkey_enabled = enabled;
        self.saved_settings.hotkey_enabled = enabled;
        self.save_settings();
        Ok(())
    }

    fn enable_hotkey(&mut self) -> Result<(), String> {
        if self.hotkey_handle.is_some() {
            return Ok(());
        }
        let registrar = self
            .hotkeys
            .as_ref()
            .ok_or_else(|| "Global hotkey is not available on this system".to_string())?;

        let ui = self.ui.clone();
        let handle = registrar
            .register(
                &self.settings.hotkey,
                Box::new(move || {
                    ui.post(UiEvent::HotkeyPressed);
                }),
            )
            .map_err(|e| e.to_string())?;

        self.hotkey_handle = Some(handle);
        self.view.hotkey_enabled = true;
        Ok(())
    }

    fn disable_hotkey(&mut self) {
        if let Some(mut handle) = self.hotkey_handle.take() {
            log::info!("Releasing global hotkey '{}'", handle.combo());
            handle.unregister();
        }
        self.view.hotkey_enabled = false;
    }

    /// Select a model from the discovered list (any name if none discovered)
    pub fn select_model(&mut self, name: &str) -> Result<(), String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("No model selected.".to_string());
        }
        if !self.view.models.is_empty() && !self.view.models.iter().any(|m| m == name) {
            return Err(format!("Unknown model '{}'. Available: {}", name, self.view.models.join(", ")));
        }
        self.view.selected_model = name.to_string();
        self.settings.default_model = name.to_string();
        self.saved_settings.default_model = name.to_string();
        self.save_settings();
        Ok(())
    }

    /// Fetch the model list in the background
    pub fn load_models(&self) {
        let client = self.client.clone();
        let ui = self.ui.clone();
        self.runtime.spawn(async move {
            let models = client.list_models().await;
            ui.post(UiEvent::ModelsLoaded(models));
        });
    }

    /// Probe the server in the background
    pub fn probe_status(&self) {
        let client = self.client.clone();
        let ui = self.ui.clone();
        self.runtime.spawn(async move {
            let status = client.ping().await;
            ui.post(UiEvent::StatusProbed(status));
        });
    }

    pub fn allow_list_mut(&mut self) -> &mut AllowList {
        &mut self.allow_list
    }

    pub fn save_allow_list(&self) -> Result<usize, String> {
        self.allow_list
            .save(&self.paths.allow_list_file())
            .map(|()| self.allow_list.len())
            .map_err(|e| format!("Failed to save domains: {}", e))
    }

    pub fn load_allow_list(&mut self) -> Result<usize, String> {
        let list = AllowList::load(&self.paths.allow_list_file()).map_err(|e| format!("Error loading domains: {}", e))?;
        self.allow_list = list;
        Ok(self.allow_list.len())
    }

    fn on_clipboard_changed(&mut self, snapshot: ClipboardSnapshot) {
        // Already queued before the monitor was paused
        if !self.view.auto_monitor {
            return;
        }

        if snapshot.char_count() > 10 {
            log::info!(
                "Clipboard updated - {} characters: '{}'",
                snapshot.char_count(),
                preview(&snapshot.text, 100)
            );
        }
        self.view.set_clipboard(snapshot.text);

        if self.settings.auto_dispatch {
            self.dispatch(Trigger::Auto);
        }
    }

    fn on_hotkey_pressed(&mut self) {
        // Presses queued before the hotkey was disabled are dropped
        if self.hotkey_handle.is_none() {
            log::debug!("Ignoring hotkey press: hotkey disabled");
            return;
        }
        self.dispatch(Trigger::Hotkey);
    }

    fn on_dispatch_finished(&mut self, request: ChatRequest, result: ChatResult) {
        self.in_flight = false;
        self.view.send_enabled = true;

        match result {
            ChatResult::Success { text, elapsed_ms } => {
                self.view.response_time = format!(
                    "Response at {} ({:.1}s)",
                    Local::now().format("%H:%M:%S"),
                    elapsed_ms as f64 / 1000.0
                );
                self.view.set_status("Response received", NoticeLevel::Success);
                self.history.push(HistoryEntry::new(request.user_text(), text.clone()));
                self.view.response_text = text;
            }
            failure @ ChatResult::Failure { .. } => {
                let message = failure.to_string();
                log::error!("Send failed: {}", message);
                self.view.response_time.clear();
                self.view.set_status(message.clone(), NoticeLevel::Error);
                self.view.response_text = message;
            }
        }
    }

    fn on_models_loaded(&mut self, models: Vec<String>) {
        if models.is_empty() {
            log::warn!("No models discovered, keeping '{}'", self.view.selected_model);
            return;
        }
        log::info!("Models loaded: {:?}", models);

        self.view.selected_model = if models.contains(&self.settings.default_model) {
            self.settings.default_model.clone()
        } else {
            models[0].clone()
        };
        self.view.models = models;
    }

    fn on_status_probed(&mut self, status: ServerStatus) {
        let level = match status {
            ServerStatus::Connected => NoticeLevel::Success,
            _ => NoticeLevel::Error,
        };
        self.view.set_status(status.label(), level);
    }

    fn save_settings(&self) {
        if let Err(e) = self.saved_settings.save(&self.paths.settings_file()) {
            log::warn!("Failed to save settings: {}", e);
        }
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.frontend.notify(level, message);
    }

    fn render(&mut self) {
        self.frontend.render(&self.view);
    }

    fn shutdown(&mut self) {
        self.disable_hotkey();
        if let Some(monitor) = &self.monitor {
            monitor.stop();
        }
        log::info!("Shell stopped");
    }
}

/// Posts `DispatchFinished` when dropped, whatever happened to the task
struct DispatchGuard {
    ui: UiHandle,
    request: ChatRequest,
    result: Option<ChatResult>,
}

impl DispatchGuard {
    fn finish(mut self, result: ChatResult) {
        self.result = Some(result);
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        let result = self
            .result
            .take()
            .unwrap_or_else(|| ChatResult::failure(ErrorKind::Network, "request aborted before completion"));
        self.ui.post(UiEvent::DispatchFinished {
            request: self.request.clone(),
            result,
        });
    }
}
