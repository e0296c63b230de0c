//! Clipboard Ollama - Session log files
//!
//! Two append-only, line-oriented logs rotated by calendar day:
//! general activity and the full request/response transcript

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::Level;
use parking_lot::Mutex;

const ACTIVITY_PREFIX: &str = "clipboard_ollama";
const TRANSCRIPT_PREFIX: &str = "ollama_responses";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Day-rotated activity and transcript log
pub struct SessionLog {
    dir: PathBuf,
    /// Serializes writers so lines from concurrent requests never interleave
    write_lock: Mutex<()>,
}

impl SessionLog {
    /// Create the log directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Activity log file for the given day
    pub fn activity_file(&self, day: DateTime<Local>) -> PathBuf {
        self.dir.join(format!("{}_{}.log", ACTIVITY_PREFIX, day.format("%Y%m%d")))
    }

    /// Transcript log file for the given day
    pub fn transcript_file(&self, day: DateTime<Local>) -> PathBuf {
        self.dir.join(format!("{}_{}.log", TRANSCRIPT_PREFIX, day.format("%Y%m%d")))
    }

    /// Append one activity line, mirrored to the `log` facade
    pub fn activity(&self, level: Level, message: &str) {
        log::log!(level, "{}", message);
        self.activity_at(Local::now(), level, message);
    }

    /// Append transcript lines as one block
    pub fn transcript(&self, lines: &[String]) {
        self.transcript_at(Local::now(), lines);
    }

    pub(crate) fn activity_at(&self, now: DateTime<Local>, level: Level, message: &str) {
        let line = format!("{} | {} | {}", now.format(TIMESTAMP_FORMAT), level, message);
        self.append(&self.activity_file(now), &[line]);
    }

    pub(crate) fn transcript_at(&self, now: DateTime<Local>, lines: &[String]) {
        let stamp = now.format(TIMESTAMP_FORMAT).to_string();
        let lines: Vec<String> = lines.iter().map(|l| format!("{} | {}", stamp, l)).collect();
        self.append(&self.transcript_file(now), &lines);
    }

    fn append(&self, path: &Path, lines: &[String]) {
        let _guard = self.write_lock.lock();
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| {
                for line in lines {
                    writeln!(file, "{}", line)?;
                }
                Ok(())
            });

        if let Err(e) = result {
            log::warn!("Failed to write session log {:?}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn activity_lines_are_timestamped_and_leveled() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::open(dir.path().join("logs")).unwrap();

        log.activity_at(at(2025, 3, 14, 9), Level::Info, "Model: gemma3:1b");
        log.activity_at(at(2025, 3, 14, 10), Level::Error, "HTTP 500");

        let content = fs::read_to_string(dir.path().join("logs/clipboard_ollama_20250314.log")).unwrap();
        assert_eq!(
            content,
            "2025-03-14 09:00:00 | INFO | Model: gemma3:1b\n2025-03-14 10:00:00 | ERROR | HTTP 500\n"
        );
    }

    #[test]
    fn rotates_by_calendar_day() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::open(dir.path()).unwrap();

        log.transcript_at(at(2025, 3, 14, 23), &["first".to_string()]);
        log.transcript_at(at(2025, 3, 15, 0), &["second".to_string()]);

        let day1 = fs::read_to_string(log.transcript_file(at(2025, 3, 14, 0))).unwrap();
        let day2 = fs::read_to_string(log.transcript_file(at(2025, 3, 15, 0))).unwrap();
        assert_eq!(day1, "2025-03-14 23:00:00 | first\n");
        assert_eq!(day2, "2025-03-15 00:00:00 | second\n");
    }

    #[test]
    fn appends_instead_of_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::open(dir.path()).unwrap();

        log.activity(Level::Info, "one");
        log.activity(Level::Warn, "two");

        let content = fs::read_to_string(log.activity_file(Local::now())).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
