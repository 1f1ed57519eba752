//! Update status of installed mods against remote releases
//!
//! Matching is a literal string comparison between the locally declared
//! version and the first (newest) remote release. There is no semantic
//! version ordering: anything that differs from the newest release is
//! reported as an available update.

pub mod checker;

pub use checker::{run_update_check, spawn_update_check, CheckEvent, CheckJob};

use crate::modrinth::RemoteRelease;
use crate::mods::ModRecord;
use std::fmt;

/// Label for the latest-version column before a successful lookup
pub const NOT_CHECKED: &str = "Not checked";

/// Derived display status of a mod
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateStatus {
    #[default]
    NotChecked,
    UpToDate,
    UpdateAvailable,
    /// The local version could not be determined
    Unknown,
    /// An older release was picked by the user; no further comparison
    Downgraded,
}

impl UpdateStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UpdateStatus::NotChecked => "Installed",
            UpdateStatus::UpToDate => "Up to date",
            UpdateStatus::UpdateAvailable => "Update available",
            UpdateStatus::Unknown => "Unknown",
            UpdateStatus::Downgraded => "Downgraded",
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of comparing one mod with its release list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Newest remote version; `None` when there were no releases
    pub latest_version: Option<String>,
    pub status: UpdateStatus,
}

impl Classification {
    pub fn not_checked() -> Self {
        Self {
            latest_version: None,
            status: UpdateStatus::NotChecked,
        }
    }

    pub fn latest_label(&self) -> &str {
        self.latest_version.as_deref().unwrap_or(NOT_CHECKED)
    }
}

/// Classify a locally installed mod against its releases (newest first)
pub fn classify(local: &ModRecord, releases: &[RemoteRelease]) -> Classification {
    classify_version(local.declared_version.as_deref(), releases)
}

/// Classify a local version string against releases (newest first)
pub fn classify_version(local_version: Option<&str>, releases: &[RemoteRelease]) -> Classification {
    let Some(latest) = releases.first() else {
        return Classification::not_checked();
    };
    let latest = latest.version_number.clone();

    let status = match local_version {
        None => UpdateStatus::Unknown,
        Some(local) if local == latest => UpdateStatus::UpToDate,
        Some(_) => UpdateStatus::UpdateAvailable,
    };

    Classification {
        latest_version: Some(latest),
        status,
    }
}
