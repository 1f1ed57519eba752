//! XDG-compliant path management

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Manages all application paths using XDG base directory specification
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directories from XDG
    dirs: ProjectDirs,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    /// Create a new Paths instance
    pub fn new() -> Self {
        let dirs = ProjectDirs::from("", "", "mcmod-updater")
            .expect("Failed to determine project directories");
        Self { dirs }
    }

    // ========== Config Paths ==========

    /// Config directory: ~/.config/mcmod-updater/
    pub fn config_dir(&self) -> PathBuf {
        self.dirs.config_dir().to_path_buf()
    }

    /// Main config file: ~/.config/mcmod-updater/config.toml
    pub fn config_file(&self) -> PathBuf {
        self.config_dir().join("config.toml")
    }

    // ========== Data Paths ==========

    /// Data directory: ~/.local/share/mcmod-updater/
    pub fn data_dir(&self) -> PathBuf {
        self.dirs.data_dir().to_path_buf()
    }

    /// Activity log shown in the UI: ~/.local/share/mcmod-updater/activity.log
    pub fn activity_log_file(&self) -> PathBuf {
        self.data_dir().join("activity.log")
    }

    /// Diagnostic tracing output: ~/.local/share/mcmod-updater/mcmod-updater.log
    pub fn diagnostics_log_file(&self) -> PathBuf {
        self.data_dir().join("mcmod-updater.log")
    }

    // ========== Utility Methods ==========

    /// Ensure all required directories exist
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.config_dir())?;
        std::fs::create_dir_all(self.data_dir())?;
        Ok(())
    }
}

/// Conventional Minecraft mods folder for the current platform
pub fn default_mods_dir() -> PathBuf {
    let Some(base) = BaseDirs::new() else {
        return PathBuf::from(".minecraft").join("mods");
    };

    if cfg!(target_os = "windows") {
        // %APPDATA%
        base.config_dir().join(".minecraft").join("mods")
    } else if cfg!(target_os = "macos") {
        base.home_dir()
            .join("Library")
            .join("Application Support")
            .join("minecraft")
            .join("mods")
    } else {
        base.home_dir().join(".minecraft").join("mods")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mods_dir_ends_with_mods() {
        let dir = default_mods_dir();
        assert_eq!(dir.file_name().and_then(|n| n.to_str()), Some("mods"));
        assert!(dir
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.contains("minecraft")));
    }
}
