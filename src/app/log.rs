//! Append-only activity log
//!
//! Every message opens the file, appends one `[timestamp] message` line and
//! closes it again. Concurrent writers can interleave lines but never leave
//! a half-open handle behind.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Activity log file
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append a message stamped with the current local time; returns the written line
    pub fn append(&self, message: &str) -> Result<String> {
        let line = format_line(Local::now(), message);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open activity log {}", self.path.display()))?;
        writeln!(file, "{}", line).context("Failed to write activity log")?;

        Ok(line)
    }

    /// All lines currently in the file (empty if it does not exist yet)
    pub fn read_lines(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path).context("Failed to read activity log")?;
        Ok(content.lines().map(str::to_string).collect())
    }

    /// Truncate the log
    pub fn clear(&self) -> Result<()> {
        std::fs::write(&self.path, "").context("Failed to clear activity log")
    }
}

/// `[2025-01-31 18:04:05] message`
pub fn format_line(timestamp: DateTime<Local>, message: &str) -> String {
    format!("[{}] {}", timestamp.format(TIMESTAMP_FORMAT), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_line() {
        let ts = Local.with_ymd_and_hms(2025, 1, 31, 18, 4, 5).unwrap();
        assert_eq!(format_line(ts, "Loading mods"), "[2025-01-31 18:04:05] Loading mods");
    }

    #[test]
    fn test_append_read_clear() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path().join("activity.log"));
        assert!(log.read_lines().unwrap().is_empty());

        log.append("first").unwrap();
        let second = log.append("second").unwrap();
        assert!(second.ends_with("] second"));

        let lines = log.read_lines().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] first"));

        log.clear().unwrap();
        assert!(log.read_lines().unwrap().is_empty());

        log.append("after clear").unwrap();
        assert_eq!(log.read_lines().unwrap().len(), 1);
    }
}
