//! Application state management

use super::log::ActivityLog;
use crate::mods::{ModRecord, UNKNOWN_VERSION};
use crate::updates::{CheckEvent, Classification, UpdateStatus, NOT_CHECKED};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedReceiver;

/// Lines of the activity log kept for display
const LOG_VIEW_CAPACITY: usize = 500;

/// Input mode (for text input)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    ModsDirectoryInput,
    GameVersionInput,
}

/// Modal notice shown until dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

/// One row of the mod table.
///
/// Version and status fields are display state only; changing them never
/// touches the archive on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModRow {
    pub record: ModRecord,
    pub current_version: Option<String>,
    pub latest_version: Option<String>,
    pub status: UpdateStatus,
}

impl From<ModRecord> for ModRow {
    fn from(record: ModRecord) -> Self {
        let current_version = record.declared_version.clone();
        Self {
            record,
            current_version,
            latest_version: None,
            status: UpdateStatus::NotChecked,
        }
    }
}

impl ModRow {
    pub fn name(&self) -> &str {
        &self.record.display_name
    }

    pub fn current_label(&self) -> &str {
        self.current_version.as_deref().unwrap_or(UNKNOWN_VERSION)
    }

    pub fn latest_label(&self) -> &str {
        self.latest_version.as_deref().unwrap_or(NOT_CHECKED)
    }

    /// (name, current, latest, status) as displayed
    pub fn cells(&self) -> [&str; 4] {
        [
            self.name(),
            self.current_label(),
            self.latest_label(),
            self.status.label(),
        ]
    }

    /// Record a check result; a `NotChecked` result leaves the row untouched
    pub fn apply_check(&mut self, classification: Classification) {
        if classification.status == UpdateStatus::NotChecked {
            return;
        }
        self.latest_version = classification.latest_version;
        self.status = classification.status;
    }

    /// The user picked `version` as an update
    pub fn apply_update(&mut self, version: &str) {
        self.current_version = Some(version.to_string());
        self.latest_version = Some(version.to_string());
        self.status = UpdateStatus::UpToDate;
    }

    /// The user picked `version` as a downgrade; the latest column is kept
    pub fn apply_downgrade(&mut self, version: &str) {
        self.current_version = Some(version.to_string());
        self.status = UpdateStatus::Downgraded;
    }
}

/// Application state, owned and mutated by the UI task only
#[derive(Debug)]
pub struct AppState {
    /// Directory scanned for mods
    pub mods_dir: PathBuf,

    /// Game version filter for checks and updates
    pub game_version: String,

    /// Mod table, in directory listing order
    pub rows: Vec<ModRow>,

    /// Row under the cursor
    pub cursor: usize,

    /// Toggled rows
    pub selected: BTreeSet<usize>,

    /// Activity log file
    pub log: ActivityLog,

    /// Recent activity log lines (for display)
    pub log_lines: Vec<String>,

    /// Modal notice
    pub notice: Option<Notice>,

    /// Receiver of a running bulk check
    pub check_events: Option<UnboundedReceiver<CheckEvent>>,

    /// Input mode (for text input)
    pub input_mode: InputMode,

    /// Current input buffer
    pub input_buffer: String,

    /// Should quit
    pub should_quit: bool,
}

impl AppState {
    pub fn new(mods_dir: PathBuf, game_version: String, log: ActivityLog) -> Self {
        Self {
            mods_dir,
            game_version,
            rows: Vec::new(),
            cursor: 0,
            selected: BTreeSet::new(),
            log,
            log_lines: Vec::new(),
            notice: None,
            check_events: None,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            should_quit: false,
        }
    }

    /// Write a line to the activity log and the log view
    pub fn log(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::info!("{}", message);

        let line = match self.log.append(message) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("{:#}", e);
                super::log::format_line(chrono::Local::now(), message)
            }
        };

        self.log_lines.push(line);
        if self.log_lines.len() > LOG_VIEW_CAPACITY {
            let excess = self.log_lines.len() - LOG_VIEW_CAPACITY;
            self.log_lines.drain(..excess);
        }
    }

    pub fn show_notice(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.notice = Some(Notice {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn is_checking(&self) -> bool {
        self.check_events.is_some()
    }

    /// Replace the table after a rescan; selection and cursor reset
    pub fn set_rows(&mut self, records: Vec<ModRecord>) {
        self.rows = records.into_iter().map(ModRow::from).collect();
        self.selected.clear();
        self.cursor = 0;
    }

    pub fn row_mut(&mut self, file_name: &str) -> Option<&mut ModRow> {
        self.rows.iter_mut().find(|r| r.record.file_name == file_name)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.rows.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }

    pub fn toggle_selected(&mut self) {
        if self.cursor >= self.rows.len() {
            return;
        }
        if !self.selected.remove(&self.cursor) {
            self.selected.insert(self.cursor);
        }
    }

    /// Select every row, or clear the selection if everything is selected
    pub fn toggle_select_all(&mut self) {
        if self.selected.len() == self.rows.len() {
            self.selected.clear();
        } else {
            self.selected = (0..self.rows.len()).collect();
        }
    }
}
