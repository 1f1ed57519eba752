//! User-triggered actions: loading mods, bulk checks, picking versions

use super::{App, InputError};
use crate::modrinth::RemoteRelease;
use crate::mods::{scan_mods_dir, ModRecord, ScanError};
use crate::updates::{spawn_update_check, CheckEvent, CheckJob};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{self, error::TryRecvError};

/// Why the user is picking a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Releases filtered to the current game version
    Update,
    /// Full release history
    Downgrade,
}

impl SelectionMode {
    pub fn verb(&self) -> &'static str {
        match self {
            SelectionMode::Update => "Updated",
            SelectionMode::Downgrade => "Downgraded",
        }
    }
}

/// Modal single-choice release picker
pub trait VersionPicker {
    /// Index into `releases` of the user's choice, or `None` if they cancelled
    fn pick(&mut self, title: &str, releases: &[RemoteRelease]) -> Option<usize>;
}

/// Per-batch tally of a selection session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Rows that took a picked version
    pub applied: usize,
    /// Rows with no catalog match or no releases
    pub skipped: usize,
    /// Rows where the user closed the picker
    pub cancelled: usize,
}

impl App {
    // ========== Mods Directory ==========

    /// Rescan the mods directory and rebuild the table.
    ///
    /// On a missing directory or a directory without mods the table is left
    /// as it was.
    pub fn load_mods(&mut self) -> Result<usize, InputError> {
        let dir = self.state.mods_dir.clone();
        let records = self.scan(&dir)?;
        Ok(self.show_records(records))
    }

    /// Point the app at another mods directory and rescan it.
    ///
    /// Folder, config and table only change once the new folder scanned
    /// successfully.
    pub fn set_mods_dir(&mut self, dir: &str) -> Result<usize, InputError> {
        let candidate = PathBuf::from(dir.trim());
        let records = self.scan(&candidate)?;

        if let Err(e) = self.config.set_mods_dir(dir) {
            tracing::warn!("{}", e);
            return Err(ScanError::MissingDirectory(candidate).into());
        }
        self.state.mods_dir = candidate;
        Ok(self.show_records(records))
    }

    fn scan(&mut self, dir: &Path) -> Result<Vec<ModRecord>, InputError> {
        self.state.log(format!("Loading mods from: {}", dir.display()));

        match scan_mods_dir(dir) {
            Ok(records) => Ok(records),
            Err(e) => {
                self.state.log(e.to_string());
                Err(e.into())
            }
        }
    }

    fn show_records(&mut self, records: Vec<ModRecord>) -> usize {
        let count = records.len();
        self.state.log(format!("Found {} mod files.", count));

        for record in &records {
            tracing::debug!(
                "{}: {} {} ({})",
                record.file_name,
                record.loader_kind,
                record.version_label(),
                record.mod_id.as_deref().unwrap_or("-")
            );
            if let Some(diagnostic) = &record.diagnostic {
                tracing::warn!("{}: {}", record.file_name, diagnostic);
            }
        }

        self.state.set_rows(records);
        self.state.log("Finished loading mods.");
        count
    }

    /// Change the game version used to filter releases
    pub fn set_game_version(&mut self, version: &str) {
        let version = version.trim().to_string();
        self.config.game_version = version.clone();
        self.state.game_version = version;
        self.state.log(format!("Minecraft version set to {}", self.state.game_version));
    }

    pub fn clear_log(&mut self) {
        if let Err(e) = self.state.log.clear() {
            tracing::warn!("{:#}", e);
        }
        self.state.log_lines.clear();
    }

    fn version_filter(&self) -> Option<String> {
        let version = self.state.game_version.trim();
        (!version.is_empty()).then(|| version.to_string())
    }

    // ========== Bulk Check ==========

    /// Start checking every listed mod on a background task.
    /// Results arrive through [`App::poll_update_check`].
    pub fn start_update_check(&mut self) -> Result<(), InputError> {
        if self.state.rows.is_empty() {
            return Err(InputError::NoModsLoaded);
        }
        if self.state.is_checking() {
            return Err(InputError::CheckInProgress);
        }

        let jobs: Vec<CheckJob> = self
            .state
            .rows
            .iter()
            .map(|row| CheckJob {
                file_name: row.record.file_name.clone(),
                display_name: row.name().to_string(),
                current_version: row.current_version.clone(),
            })
            .collect();

        self.state.log("Checking for updates for all mods...");

        let (tx, rx) = mpsc::unbounded_channel();
        spawn_update_check(self.catalog.clone(), jobs, self.version_filter(), tx);
        self.state.check_events = Some(rx);
        Ok(())
    }

    /// Apply whatever the bulk check has reported so far; returns the number of events handled
    pub fn poll_update_check(&mut self) -> usize {
        let Some(rx) = self.state.check_events.as_mut() else {
            return 0;
        };

        let mut events = Vec::new();
        let mut finished = false;
        loop {
            match rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    finished = true;
                    break;
                }
            }
        }

        let handled = events.len();
        for event in events {
            match event {
                CheckEvent::Log(message) => self.state.log(message),
                CheckEvent::Checked {
                    file_name,
                    classification,
                } => {
                    if let Some(row) = self.state.row_mut(&file_name) {
                        row.apply_check(classification);
                    }
                }
                CheckEvent::Finished { checked, total } => {
                    tracing::info!("Update check finished: {}/{} mods matched", checked, total);
                    finished = true;
                }
            }
        }

        if finished {
            self.state.check_events = None;
        }
        handled
    }

    // ========== Update / Downgrade ==========

    /// Let the user pick a release for every selected row.
    ///
    /// A row without a catalog match or without releases is logged and
    /// skipped; the batch always runs to the end.
    pub async fn select_versions(
        &mut self,
        mode: SelectionMode,
        picker: &mut dyn VersionPicker,
    ) -> Result<SessionOutcome, InputError> {
        if self.state.selected.is_empty() {
            return Err(InputError::NothingSelected);
        }

        let filter = match mode {
            SelectionMode::Update => self.version_filter(),
            SelectionMode::Downgrade => None,
        };
        let indices: Vec<usize> = self.state.selected.iter().copied().collect();
        let mut outcome = SessionOutcome::default();

        for index in indices {
            let Some(row) = self.state.rows.get(index) else {
                continue;
            };
            let name = row.name().to_string();

            let Some(hit) = self.catalog.search(&name).await else {
                self.state.log(format!("No results found for {}", name));
                outcome.skipped += 1;
                continue;
            };

            let releases = self
                .catalog
                .fetch_releases(&hit.project_id, filter.as_deref())
                .await;
            if releases.is_empty() {
                self.state.log(format!("No versions found for {}", name));
                outcome.skipped += 1;
                continue;
            }

            let title = format!("Select version for {}", name);
            let Some(release) = picker
                .pick(&title, &releases)
                .and_then(|choice| releases.get(choice))
            else {
                outcome.cancelled += 1;
                continue;
            };
            let version = release.version_number.clone();

            self.state
                .log(format!("Selected version {} for {}", version, name));
            if let Some(row) = self.state.rows.get_mut(index) {
                match mode {
                    SelectionMode::Update => row.apply_update(&version),
                    SelectionMode::Downgrade => row.apply_downgrade(&version),
                }
            }
            self.state
                .log(format!("{} {} to version {}", mode.verb(), name, version));
            outcome.applied += 1;
        }

        Ok(outcome)
    }
}
