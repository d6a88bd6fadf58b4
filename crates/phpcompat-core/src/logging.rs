//! Logging module for phpcompat
//!
//! Optional file log of configuration resolution and per-file sniff runs.
//! Every function is a no-op until [`init_logger`] has been called.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::test_version::TestedVersionRange;

/// Global logger instance
static LOGGER: Mutex<Option<CompatLogger>> = Mutex::new(None);

/// Logger writing timestamped lines to a file
pub struct CompatLogger {
    file: File,
}

impl CompatLogger {
    /// Create a new logger writing to the specified path
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        Ok(Self { file })
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
}

/// Initialize the global logger, defaulting to a timestamped file in /tmp
pub fn init_logger(log_path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = log_path.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("/tmp/phpcompat-{}.log", timestamp))
    });

    let logger = CompatLogger::new(&path)?;

    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }

    Ok(path)
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

/// Log the resolved testVersion range and where it came from
pub fn log_test_version(source: &str, range: &TestedVersionRange) {
    section("TEST VERSION");
    log(&format!("[{}] testVersion = {}", source, range));
    if range.is_unbounded() {
        log("No testVersion configured: removals checked against latest, new features skipped");
    }
}

/// Log a sniff run over one file
pub fn log_sniff_run(sniff: &str, file: &Path, found: usize) {
    log(&format!("{} on {}: {} diagnostic(s)", sniff, file.display(), found));
}

/// Log a lifecycle table load
pub fn log_table_loaded(table: &str, entries: usize) {
    log(&format!("Loaded table {} with {} entries", table, entries));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_logger_writes_timestamped_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("compat.log");

        let mut logger = CompatLogger::new(&path).unwrap();
        logger.section("TEST VERSION");
        logger.log("testVersion = 7.2");

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 4);
        assert!(content.lines().all(|l| l.starts_with('[')));
        assert!(content.contains("testVersion = 7.2"));
    }
}
