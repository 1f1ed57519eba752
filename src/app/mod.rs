//! Application state and orchestration

mod actions;
pub mod log;
pub mod state;

pub use actions::{SelectionMode, SessionOutcome, VersionPicker};
pub use log::ActivityLog;
pub use state::{AppState, InputMode, ModRow, Notice};

use crate::config::Config;
use crate::modrinth::Catalog;
use crate::mods::ScanError;
use anyhow::{Context, Result};
use std::sync::Arc;
use thiserror::Error;

/// Problems with what the user asked for. Shown as a notice; nothing changes.
#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("No mods loaded")]
    NoModsLoaded,

    #[error("No mods selected")]
    NothingSelected,

    #[error("An update check is already running")]
    CheckInProgress,
}

/// Main application struct that orchestrates all components
pub struct App {
    /// Application configuration
    pub config: Config,

    /// Application state
    pub state: AppState,

    /// Remote mod catalog
    pub catalog: Arc<dyn Catalog>,
}

impl App {
    /// Create a new App instance
    pub fn new(config: Config, catalog: Arc<dyn Catalog>) -> Result<Self> {
        // Ensure directories exist
        config.ensure_dirs().context("Failed to create directories")?;

        let log = ActivityLog::new(config.activity_log_file());
        let mut state = AppState::new(config.mods_dir(), config.game_version.clone(), log);

        state.log(format!(
            "Application started at {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        state.log(format!("Default Minecraft version: {}", state.game_version));

        Ok(Self {
            config,
            state,
            catalog,
        })
    }

    /// Persist user edits and close the session
    pub async fn shutdown(&mut self) -> Result<()> {
        // a bulk check still in flight just loses its receiver
        self.state.check_events = None;
        self.state.log("Application closed.");
        self.config.save().await
    }
}
