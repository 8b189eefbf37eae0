//! Run log for rewrite sessions
//!
//! Records the decisions the engines take (operations rejected, containers
//! folded, edits emitted) to a timestamped file for debugging. Nothing is
//! written until `init_logger` has been called.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Global logger instance
static LOGGER: Mutex<Option<RewriteLogger>> = Mutex::new(None);

/// Logger for rewrite operations
pub struct RewriteLogger {
    file: File,
    path: PathBuf,
}

impl RewriteLogger {
    /// Create a new logger writing to the specified path
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        Ok(Self {
            file,
            path: log_path.to_path_buf(),
        })
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a log message
    pub fn log(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(self.file, "[{}] {}", timestamp, message);
        let _ = self.file.flush();
    }

    /// Log a section header
    pub fn section(&mut self, title: &str) {
        let separator = "=".repeat(60);
        self.log(&separator);
        self.log(title);
        self.log(&separator);
    }

    /// Log a subsection
    pub fn subsection(&mut self, title: &str) {
        let separator = "-".repeat(40);
        self.log(&separator);
        self.log(title);
        self.log(&separator);
    }
}

/// Initialize the global logger
pub fn init_logger(log_path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = log_path.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        std::env::temp_dir().join(format!("jrewrite-{}.log", timestamp))
    });

    let logger = RewriteLogger::new(&path)?;

    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }

    Ok(path)
}

/// Stop logging and close the file
pub fn shutdown() {
    if let Ok(mut guard) = LOGGER.lock() {
        *guard = None;
    }
}

/// Log a message to the global logger
pub fn log(message: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.log(message);
        }
    }
}

/// Log a section header
pub fn section(title: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.section(title);
        }
    }
}

/// Log a subsection
pub fn subsection(title: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.subsection(title);
        }
    }
}

/// Check if logging is enabled
pub fn is_enabled() -> bool {
    if let Ok(guard) = LOGGER.lock() {
        guard.is_some()
    } else {
        false
    }
}

/// Log the number of edits a session produced
pub fn log_edits_emitted(session: &str, count: usize) {
    log(&format!("[{}] emitted {} edit(s)", session, count));
}

/// Log an operation the session refused
pub fn log_rejected(session: &str, reason: &str) {
    log(&format!("[{}] REJECTED: {}", session, reason));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_writes_timestamped_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("run.log");

        let mut logger = RewriteLogger::new(&path).unwrap();
        logger.section("IMPORTS");
        logger.log("folded java.util");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("IMPORTS"));
        assert!(contents.contains("] folded java.util"));
        assert_eq!(logger.path(), path.as_path());
    }
}
