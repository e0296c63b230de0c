//! Clipboard Ollama - Clipboard monitoring module
//!
//! Polls the system clipboard on a background thread and reports new text

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::models::ClipboardSnapshot;
use super::source::ClipboardSource;

/// Clipboard monitor
pub struct ClipboardMonitor {
    /// Whether running
    running: Arc<AtomicBool>,
    /// Polling interval (milliseconds)
    poll_interval_ms: u64,
    /// Whether paused (auto-monitor switched off)
    paused: Arc<AtomicBool>,
    source: Arc<dyn ClipboardSource>,
}

impl ClipboardMonitor {
    /// Create a new monitor
    pub fn new(poll_interval_ms: u64, source: Arc<dyn ClipboardSource>) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            poll_interval_ms,
            paused: Arc::new(AtomicBool::new(false)),
            source,
        }
    }

    /// Start monitoring
    ///
    /// callback: called on the monitor thread, in capture order, for every
    /// snapshot whose text differs from the previous one
    pub fn start<F>(&self, callback: F)
    where
        F: Fn(ClipboardSnapshot) + Send + 'static,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            log::warn!("Clipboard monitor is already running");
            return;
        }

        let running = Arc::clone(&self.running);
        let paused = Arc::clone(&self.paused);
        let source = Arc::clone(&self.source);
        let interval = Duration::from_millis(self.poll_interval_ms);

        thread::spawn(move || {
            log::info!("Clipboard monitor started with {}ms interval", interval.as_millis());

            // Last seen text, owned by this thread only
            let mut last_text = String::new();

            while running.load(Ordering::SeqCst) {
                if !paused.load(Ordering::SeqCst) {
                    if let Some(snapshot) = Self::poll_once(source.as_ref(), &mut last_text) {
                        log::debug!("[Monitor] New content detected: {} chars", snapshot.char_count());
                        callback(snapshot);
                    }
                }

                thread::sleep(interval);
            }

            log::info!("Clipboard monitor stopped");
        });
    }

    /// Stop monitoring
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Pause monitoring; a paused monitor performs no clipboard reads
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Resume monitoring
    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    /// One poll tick
    ///
    /// Returns a snapshot when the text changed and is non-empty after
    /// trimming; read errors are logged and produce nothing.
    pub fn poll_once(source: &dyn ClipboardSource, last_text: &mut String) -> Option<ClipboardSnapshot> {
        let text = match source.read_text() {
            Ok(text) => text,
            Err(e) => {
                log::error!("[Monitor] {}", e);
                return None;
            }
        };

        let snapshot = ClipboardSnapshot::new(text);
        if snapshot.text == *last_text || !snapshot.has_content() {
            return None;
        }

        last_text.clone_from(&snapshot.text);
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardError;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;

    /// Replays a fixed script, then keeps returning the last value
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<String, String>>>,
        last: Mutex<String>,
        reads: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(script: &[Result<&str, &str>]) -> Self {
            Self {
                script: Mutex::new(
                    script
                        .iter()
                        .map(|r| r.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
                last: Mutex::new(String::new()),
                reads: AtomicUsize::new(0),
            }
        }
    }

    impl ClipboardSource for ScriptedSource {
        fn read_text(&self) -> Result<String, ClipboardError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            match self.script.lock().pop_front() {
                Some(Ok(text)) => {
                    *self.last.lock() = text.clone();
                    Ok(text)
                }
                Some(Err(e)) => Err(ClipboardError::Read(e)),
                None => Ok(self.last.lock().clone()),
            }
        }
    }

    #[test]
    fn fires_only_on_changed_meaningful_text() {
        let source = ScriptedSource::new(&[
            Ok("hello"),
            Ok("hello"),
            Ok("   "),
            Err("boom"),
            Ok("hello"),
            Ok("world"),
            Ok(""),
            Ok("hello"),
        ]);
        let mut last = String::new();

        let fired: Vec<String> = (0..8)
            .filter_map(|_| ClipboardMonitor::poll_once(&source, &mut last))
            .map(|s| s.text)
            .collect();

        assert_eq!(fired, vec!["hello", "world", "hello"]);
        assert_eq!(last, "hello");
    }

    #[test]
    fn whitespace_capture_does_not_replace_last_seen() {
        let source = ScriptedSource::new(&[Ok("a"), Ok("\n"), Ok("a")]);
        let mut last = String::new();

        assert!(ClipboardMonitor::poll_once(&source, &mut last).is_some());
        assert!(ClipboardMonitor::poll_once(&source, &mut last).is_none());
        assert!(ClipboardMonitor::poll_once(&source, &mut last).is_none());
    }

    #[test]
    fn background_thread_delivers_in_capture_order() {
        let source = Arc::new(ScriptedSource::new(&[Ok("one"), Ok("two"), Ok("three")]));
        let monitor = ClipboardMonitor::new(5, source);
        let (tx, rx) = mpsc::channel();

        monitor.start(move |snapshot| {
            let _ = tx.send(snapshot.text);
        });

        let received: Vec<String> = (0..3)
            .map(|_| rx.recv_timeout(Duration::from_secs(2)).expect("snapshot"))
            .collect();
        monitor.stop();

        assert_eq!(received, vec!["one", "two", "three"]);
    }

    #[test]
    fn paused_monitor_reads_nothing() {
        let source = Arc::new(ScriptedSource::new(&[Ok("one")]));
        let monitor = ClipboardMonitor::new(5, source.clone());
        monitor.pause();
        let (tx, rx) = mpsc::channel();

        monitor.start(move |snapshot| {
            let _ = tx.send(snapshot.text);
        });

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert_eq!(source.reads.load(Ordering::SeqCst), 0);

        monitor.resume();
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).expect("snapshot"), "one");
        monitor.stop();
    }
}
