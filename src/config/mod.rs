//! Configuration management for mcmod-updater
//!
//! Uses XDG-compliant paths:
//! - Config: ~/.config/mcmod-updater/config.toml
//! - Data: ~/.local/share/mcmod-updater/

mod paths;

pub use paths::{default_mods_dir, Paths};

use crate::modrinth::client::{DEFAULT_BASE_URL, DEFAULT_SEARCH_LIMIT};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Game version used to filter releases until the user picks another one
pub const DEFAULT_GAME_VERSION: &str = "1.21.5";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mods directory override (platform default when unset)
    pub mods_dir: Option<String>,

    /// Minecraft version used to filter releases for checks and updates
    pub game_version: String,

    /// Modrinth API base URL
    pub api_base_url: String,

    /// User agent sent with every API request
    pub user_agent: String,

    /// Maximum number of search hits requested per query
    pub search_limit: u32,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,

    /// Override for the activity log file
    pub activity_log_override: Option<String>,

    /// Paths configuration
    #[serde(skip)]
    pub paths: Paths,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mods_dir: None,
            game_version: DEFAULT_GAME_VERSION.to_string(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("mcmod-updater/{}", crate::APP_VERSION),
            search_limit: DEFAULT_SEARCH_LIMIT,
            request_timeout_secs: 30,
            activity_log_override: None,
            paths: Paths::new(),
        }
    }
}

impl Config {
    /// Resolve the mods directory (override or platform default)
    pub fn mods_dir(&self) -> PathBuf {
        self.mods_dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(default_mods_dir)
    }

    /// Resolve the activity log file (override or default XDG path)
    pub fn activity_log_file(&self) -> PathBuf {
        self.activity_log_override
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.paths.activity_log_file())
    }

    /// Set the mods directory override, rejecting blank input
    pub fn set_mods_dir(&mut self, dir: &str) -> Result<()> {
        let trimmed = dir.trim();
        if trimmed.is_empty() {
            bail!("Mods directory cannot be empty");
        }
        self.mods_dir = Some(trimmed.to_string());
        Ok(())
    }

    /// Ensure required directories exist
    pub fn ensure_dirs(&self) -> Result<()> {
        self.paths
            .ensure_dirs()
            .context("Failed to create default application directories")?;
        if let Some(parent) = self.activity_log_file().parent() {
            std::fs::create_dir_all(parent).context("Failed to create activity log directory")?;
        }
        Ok(())
    }

    /// Load configuration from disk or create default
    pub async fn load() -> Result<Self> {
        let paths = Paths::new();
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from(&config_path).await?
        } else {
            // Create default config
            let config = Config::default();
            config.save().await?;
            config
        };

        config.paths = paths;
        Ok(config)
    }

    /// Parse a config file
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to disk
    pub async fn save(&self) -> Result<()> {
        self.save_to(&self.paths.config_file()).await
    }

    /// Write configuration to `path`
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .await
            .context("Failed to write config file")?;

        Ok(())
    }
}
