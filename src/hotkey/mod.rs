//! Clipboard Ollama - Global hotkey module
//!
//! Registers one OS-level key combination at a time and calls a handler
//! when it is pressed. Dropping or unregistering the handle releases the
//! OS hook.

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use parking_lot::Mutex;

/// How often an idle listener re-checks whether its registrar is gone
const LISTENER_TICK: Duration = Duration::from_millis(200);

/// Hotkey error type
#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("Invalid shortcut format: {0}")]
    Parse(String),
    #[error("Failed to register shortcut: {0}")]
    Os(String),
}

/// Called on the listener thread; must marshal onto the UI thread itself
pub type HotkeyHandler = Box<dyn Fn() + Send + 'static>;

pub trait HotkeyRegistrar {
    fn register(&self, combo: &str, handler: HotkeyHandler) -> Result<Box<dyn RegistrationHandle>, HotkeyError>;
}

/// Live registration; unregistering twice is a no-op
pub trait RegistrationHandle {
    fn combo(&self) -> &str;
    fn unregister(&mut self);
}

/// Registrar backed by the `global-hotkey` crate
///
/// Must be created and used on the thread that pumps platform events. One
/// listener thread serves every registration made through this registrar.
pub struct GlobalHotkeyRegistrar {
    manager: Rc<GlobalHotKeyManager>,
    active: Arc<ActiveHotkey>,
    listening: Arc<AtomicBool>,
}

impl GlobalHotkeyRegistrar {
    pub fn new() -> Result<Self, HotkeyError> {
        let manager = GlobalHotKeyManager::new().map_err(|e| HotkeyError::Os(e.to_string()))?;
        let active = Arc::new(ActiveHotkey::default());
        let listening = Arc::new(AtomicBool::new(true));
        spawn_listener(Arc::clone(&active), Arc::clone(&listening));

        Ok(Self {
            manager: Rc::new(manager),
            active,
            listening,
        })
    }
}

impl HotkeyRegistrar for GlobalHotkeyRegistrar {
    fn register(&self, combo: &str, handler: HotkeyHandler) -> Result<Box<dyn RegistrationHandle>, HotkeyError> {
        let hotkey = combo
            .parse::<HotKey>()
            .map_err(|e| HotkeyError::Parse(format!("{}: {}", combo, e)))?;

        self.manager
            .register(hotkey)
            .map_err(|e| HotkeyError::Os(e.to_string()))?;

        let generation = self.active.install(hotkey.id(), handler);
        log::info!("Global shortcut '{}' registered", combo);

        Ok(Box::new(GlobalRegistration {
            manager: Rc::clone(&self.manager),
            active: Arc::clone(&self.active),
            hotkey,
            combo: combo.to_string(),
            generation,
            registered: true,
        }))
    }
}

impl Drop for GlobalHotkeyRegistrar {
    fn drop(&mut self) {
        self.listening.store(false, Ordering::SeqCst);
    }
}

fn spawn_listener(active: Arc<ActiveHotkey>, listening: Arc<AtomicBool>) {
    thread::spawn(move || {
        let receiver = GlobalHotKeyEvent::receiver();
        while listening.load(Ordering::SeqCst) {
            if let Ok(event) = receiver.recv_timeout(LISTENER_TICK) {
                if event.state == HotKeyState::Pressed && active.fire(event.id) {
                    log::debug!("Global shortcut pressed");
                }
            }
        }
        log::debug!("Hotkey listener stopped");
    });
}

struct ActiveEntry {
    generation: u64,
    id: u32,
    handler: HotkeyHandler,
}

/// The handler of the registration currently in force
///
/// Entries are tagged with a generation so a released handle can never
/// clear the registration that replaced it, even for the same combo.
#[derive(Default)]
struct ActiveHotkey {
    next_generation: AtomicU64,
    current: Mutex<Option<ActiveEntry>>,
}

impl ActiveHotkey {
    fn install(&self, id: u32, handler: HotkeyHandler) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.current.lock() = Some(ActiveEntry {
            generation,
            id,
            handler,
        });
        generation
    }

    fn release(&self, generation: u64) -> bool {
        let mut current = self.current.lock();
        if current.as_ref().map_or(false, |entry| entry.generation == generation) {
            *current = None;
            true
        } else {
            false
        }
    }

    /// Run the handler if `id` belongs to the active registration
    fn fire(&self, id: u32) -> bool {
        match self.current.lock().as_ref() {
            Some(entry) if entry.id == id => {
                (entry.handler)();
                true
            }
            _ => false,
        }
    }
}

struct GlobalRegistration {
    manager: Rc<GlobalHotKeyManager>,
    active: Arc<ActiveHotkey>,
    hotkey: HotKey,
    combo: String,
    generation: u64,
    registered: bool,
}

impl RegistrationHandle for GlobalRegistration {
    fn combo(&self) -> &str {
        &self.combo
    }

    fn unregister(&mut self) {
        if !self.registered {
            return;
        }
        self.registered = false;
        self.active.release(self.generation);
        match self.manager.unregister(self.hotkey) {
            Ok(()) => log::info!("Global shortcut '{}' unregistered", self.combo),
            Err(e) => log::warn!("Failed to unregister shortcut '{}': {}", self.combo, e),
        }
    }
}

impl Drop for GlobalRegistration {
    fn drop(&mut self) {
        self.unregister();
    }
}

/// Drain pending OS messages so hotkey presses reach the manager
///
/// On Windows the hotkey window lives on the registering thread, which
/// therefore needs a message pump; other platforms deliver on their own.
#[cfg(windows)]
pub fn pump_platform_events() {
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::WindowsAndMessaging::{DispatchMessageW, PeekMessageW, TranslateMessage, MSG, PM_REMOVE};

    unsafe {
        let mut msg = MSG::default();
        while PeekMessageW(&mut msg, HWND(std::ptr::null_mut()), 0, 0, PM_REMOVE).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

#[cfg(not(windows))]
pub fn pump_platform_events() {}
