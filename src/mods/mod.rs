//! Locally installed mod archives
//!
//! A scan of the mods directory produces one [`ModRecord`] per `.jar` file.
//! Records are rebuilt from scratch on every scan; only the file name links
//! a record to the one from a previous scan.

pub mod metadata;

pub use metadata::{read_mod_metadata, MetadataError};

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Label shown when a mod does not declare its version
pub const UNKNOWN_VERSION: &str = "Unknown";

/// Which embedded descriptor (if any) identified the mod
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderKind {
    Forge,
    Fabric,
    Unknown,
    Error,
}

impl LoaderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoaderKind::Forge => "forge",
            LoaderKind::Fabric => "fabric",
            LoaderKind::Unknown => "unknown",
            LoaderKind::Error => "error",
        }
    }
}

impl fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mod archive found in the mods directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModRecord {
    /// Archive file name, unique within one directory listing
    pub file_name: String,
    /// Loader-declared internal identifier
    pub mod_id: Option<String>,
    /// Human-readable name, or the file stem when metadata has none
    pub display_name: String,
    /// Version declared in the archive's metadata
    pub declared_version: Option<String>,
    pub loader_kind: LoaderKind,
    /// Why metadata extraction failed (`LoaderKind::Error` only). Logged, never shown.
    pub diagnostic: Option<String>,
}

impl ModRecord {
    /// Record with no metadata, named after the archive file
    pub fn from_file(path: &Path, loader_kind: LoaderKind) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let display_name = Path::new(&file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.clone());

        Self {
            file_name,
            mod_id: None,
            display_name,
            declared_version: None,
            loader_kind,
            diagnostic: None,
        }
    }

    /// Declared version, or `"Unknown"`
    pub fn version_label(&self) -> &str {
        self.declared_version.as_deref().unwrap_or(UNKNOWN_VERSION)
    }
}

/// Failures while listing the mods directory
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Folder not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("No mod files (.jar) found in {}", .0.display())]
    NoMods(PathBuf),
}

/// List `.jar` files directly inside `dir`, sorted by file name
pub fn list_mod_archives(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::MissingDirectory(dir.to_path_buf()));
    }

    let archives: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_mod_archive(path))
        .collect();

    if archives.is_empty() {
        return Err(ScanError::NoMods(dir.to_path_buf()));
    }

    Ok(archives)
}

/// Read metadata for every mod archive in `dir`.
///
/// Per-archive failures never abort the scan; they come back as
/// `LoaderKind::Error` records.
pub fn scan_mods_dir(dir: &Path) -> Result<Vec<ModRecord>, ScanError> {
    let archives = list_mod_archives(dir)?;
    tracing::debug!("Reading metadata from {} archive(s)", archives.len());
    Ok(archives.iter().map(|path| read_mod_metadata(path)).collect())
}

fn is_mod_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("jar"))
        .unwrap_or(false)
}
