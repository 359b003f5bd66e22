//! File-backed logger
//!
//! Useful when stderr is swallowed by the host that spawned the server.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::Mutex;

use super::level::LogLevel;
use super::traits::Logger;

/// Appends timestamped, level-filtered lines to a file
#[derive(Debug)]
pub struct FileLogger {
    path: PathBuf,
    file: Mutex<File>,
    min_level: LogLevel,
}

impl FileLogger {
    /// Open (or create) the log file in append mode
    pub fn open(path: impl AsRef<Path>, min_level: LogLevel) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
            min_level,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
        let mut file = self.file.lock();
        // Logging must never take the process down.
        let _ = writeln!(file, "[{}] [{:<5}] {}", timestamp, level.as_str(), message);
        let _ = file.flush();
    }
}

impl Logger for FileLogger {
    fn debug(&self, message: &str) {
        self.write(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.write(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.write(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.write(LogLevel::Error, message);
    }
}
