//! Mod metadata extraction from `.jar` archives
//!
//! Forge-style descriptors (`META-INF/mods.toml`, `META-INF/neoforge.mods.toml`)
//! are checked before the Fabric descriptor (`fabric.mod.json`). The Forge
//! file is read line by line rather than as TOML so that a malformed file
//! still yields whatever keys it does contain.

use super::{LoaderKind, ModRecord};
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use thiserror::Error;
use zip::result::ZipError;
use zip::ZipArchive;

/// Forge-style descriptor paths, in lookup order
pub const FORGE_DESCRIPTORS: &[&str] = &["META-INF/mods.toml", "META-INF/neoforge.mods.toml"];

/// Fabric descriptor path
pub const FABRIC_DESCRIPTOR: &str = "fabric.mod.json";

/// Errors raised while reading an archive. These never leave this module;
/// [`read_mod_metadata`] folds them into a `LoaderKind::Error` record.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to open archive: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid archive: {0}")]
    Zip(#[from] ZipError),

    #[error("{entry} is not valid UTF-8")]
    Utf8 { entry: String },

    #[error("failed to parse {entry}: {source}")]
    Json {
        entry: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Identifying fields pulled from a descriptor. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DescriptorFields {
    #[serde(rename = "id")]
    pub mod_id: Option<String>,
    pub version: Option<String>,
    pub name: Option<String>,
}

/// Read the identifying record of the mod archive at `path`.
///
/// Never fails: unreadable archives come back tagged `LoaderKind::Error`
/// with the failure in `diagnostic`.
pub fn read_mod_metadata(path: &Path) -> ModRecord {
    match try_read_mod_metadata(path) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("Error analyzing JAR file {}: {}", path.display(), e);
            let mut record = ModRecord::from_file(path, LoaderKind::Error);
            record.diagnostic = Some(e.to_string());
            record
        }
    }
}

fn try_read_mod_metadata(path: &Path) -> Result<ModRecord, MetadataError> {
    let file = File::open(path)?;
    let mut zip = ZipArchive::new(file)?;

    for descriptor in FORGE_DESCRIPTORS {
        if let Some(text) = read_entry(&mut zip, descriptor)? {
            let fields = parse_forge_descriptor(&text);
            return Ok(apply_fields(path, fields, LoaderKind::Forge));
        }
    }

    if let Some(text) = read_entry(&mut zip, FABRIC_DESCRIPTOR)? {
        let fields = parse_fabric_descriptor(&text)?;
        return Ok(apply_fields(path, fields, LoaderKind::Fabric));
    }

    Ok(ModRecord::from_file(path, LoaderKind::Unknown))
}

fn apply_fields(path: &Path, fields: DescriptorFields, loader_kind: LoaderKind) -> ModRecord {
    let mut record = ModRecord::from_file(path, loader_kind);
    record.mod_id = fields.mod_id;
    record.declared_version = fields.version;
    if let Some(name) = fields.name {
        record.display_name = name;
    }
    record
}

/// Read a UTF-8 entry by exact name; `Ok(None)` if the archive has no such entry
fn read_entry<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, MetadataError> {
    let mut entry = match zip.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    let text = String::from_utf8(bytes).map_err(|_| MetadataError::Utf8 {
        entry: name.to_string(),
    })?;
    Ok(Some(text))
}

/// Scan a Forge `mods.toml` for `modId`, `version` and `displayName`.
///
/// Lines without `=` or with other keys are ignored. The first occurrence of
/// each key wins, so `modId` lines in later `[[dependencies]]` tables do not
/// override the mod's own entry.
pub fn parse_forge_descriptor(text: &str) -> DescriptorFields {
    let mut fields = DescriptorFields::default();

    for line in text.lines() {
        let Some((key, raw_value)) = line.trim().split_once('=') else {
            continue;
        };
        let slot = match key.trim() {
            "modId" => &mut fields.mod_id,
            "version" => &mut fields.version,
            "displayName" => &mut fields.name,
            _ => continue,
        };
        if slot.is_some() {
            continue;
        }
        if let Some(value) = parse_value(raw_value) {
            *slot = Some(value);
        }
    }

    fields
}

/// Strip whitespace, surrounding quotes and any trailing `# comment`
fn parse_value(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let value = match raw.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let inner = &raw[1..];
            match inner.find(quote) {
                Some(end) => &inner[..end],
                None => inner,
            }
        }
        _ => raw.split('#').next().unwrap_or_default(),
    };
    let value = value.trim().trim_matches(|c| c == '"' || c == '\'');

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse `fabric.mod.json`, reading only `id`, `version` and `name`
pub fn parse_fabric_descriptor(text: &str) -> Result<DescriptorFields, MetadataError> {
    serde_json::from_str(text.trim_start_matches('\u{feff}')).map_err(|source| MetadataError::Json {
        entry: FABRIC_DESCRIPTOR.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mods::test_support::write_jar;

    const FORGE_TOML: &str = r#"
modLoader="javafml"
loaderVersion="[47,)"
license="MIT"

[[mods]]
modId="x"
version="y"
displayName="z"
description='''
A mod = with an equals sign in the description
'''

[[dependencies.x]]
    modId="forge"
    mandatory=true
    versionRange="[47,)"
"#;

    #[test]
    fn test_forge_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let jar = write_jar(dir.path(), "x-y.jar", &[("META-INF/mods.toml", FORGE_TOML)]);

        let record = read_mod_metadata(&jar);
        assert_eq!(record.mod_id.as_deref(), Some("x"));
        assert_eq!(record.declared_version.as_deref(), Some("y"));
        assert_eq!(record.display_name, "z");
        assert_eq!(record.loader_kind, LoaderKind::Forge);
        assert!(record.diagnostic.is_none());
    }

    #[test]
    fn test_fabric_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let jar = write_jar(
            dir.path(),
            "x.jar",
            &[("fabric.mod.json", r#"{"schemaVersion":1,"id":"x","version":"y","name":"z"}"#)],
        );

        let record = read_mod_metadata(&jar);
        assert_eq!(record.mod_id.as_deref(), Some("x"));
        assert_eq!(record.declared_version.as_deref(), Some("y"));
        assert_eq!(record.display_name, "z");
        assert_eq!(record.loader_kind, LoaderKind::Fabric);
    }

    #[test]
    fn test_no_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let jar = write_jar(dir.path(), "plain-lib-2.3.jar", &[("com/example/Main.class", "cafebabe")]);

        let record = read_mod_metadata(&jar);
        assert_eq!(record.mod_id, None);
        assert_eq!(record.declared_version, None);
        assert_eq!(record.display_name, "plain-lib-2.3");
        assert_eq!(record.loader_kind, LoaderKind::Unknown);
    }

    #[test]
    fn test_not_a_zip() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("corrupt.jar");
        std::fs::write(&jar, b"definitely not a zip file").unwrap();

        let record = read_mod_metadata(&jar);
        assert_eq!(record.loader_kind, LoaderKind::Error);
        assert_eq!(record.display_name, "corrupt");
        assert_eq!(record.declared_version, None);
        assert!(record.diagnostic.is_some());
    }

    #[test]
    fn test_forge_takes_priority_over_fabric() {
        let dir = tempfile::tempdir().unwrap();
        let jar = write_jar(
            dir.path(),
            "both.jar",
            &[
                ("fabric.mod.json", r#"{"id":"fab","version":"2","name":"Fabric Side"}"#),
                ("META-INF/mods.toml", "modId=\"forgeside\"\nversion=\"1\"\n"),
            ],
        );

        let record = read_mod_metadata(&jar);
        assert_eq!(record.loader_kind, LoaderKind::Forge);
        assert_eq!(record.mod_id.as_deref(), Some("forgeside"));
        // no displayName in the descriptor
        assert_eq!(record.display_name, "both");
    }

    #[test]
    fn test_fabric_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let jar = write_jar(dir.path(), "partial.jar", &[("fabric.mod.json", r#"{"id":"partial"}"#)]);

        let record = read_mod_metadata(&jar);
        assert_eq!(record.loader_kind, LoaderKind::Fabric);
        assert_eq!(record.mod_id.as_deref(), Some("partial"));
        assert_eq!(record.declared_version, None);
        assert_eq!(record.display_name, "partial");
    }

    #[test]
    fn test_malformed_fabric_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let jar = write_jar(dir.path(), "bad.jar", &[("fabric.mod.json", "{ not json")]);

        let record = read_mod_metadata(&jar);
        assert_eq!(record.loader_kind, LoaderKind::Error);
        assert!(record.diagnostic.unwrap().contains("fabric.mod.json"));
    }

    #[test]
    fn test_forge_lines_without_equals_are_skipped() {
        let fields = parse_forge_descriptor("[[mods]]\nmodId\ngarbage line\nversion = '3.1'\n");
        assert_eq!(fields.mod_id, None);
        assert_eq!(fields.version.as_deref(), Some("3.1"));
    }

    #[test]
    fn test_forge_version_range_is_not_version() {
        let fields = parse_forge_descriptor("versionRange=\"[1,)\"\nversion=\"1.2\"\n");
        assert_eq!(fields.version.as_deref(), Some("1.2"));
    }

    #[test]
    fn test_forge_placeholder_version_is_kept_verbatim() {
        let fields = parse_forge_descriptor("modId=\"a\"\nversion=\"${file.jarVersion}\"\n");
        assert_eq!(fields.mod_id.as_deref(), Some("a"));
        assert_eq!(fields.version.as_deref(), Some("${file.jarVersion}"));
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(" \"abc\" # trailing").as_deref(), Some("abc"));
        assert_eq!(parse_value("'a=b'").as_deref(), Some("a=b"));
        assert_eq!(parse_value("bare # comment").as_deref(), Some("bare"));
        assert_eq!(parse_value("\"\""), None);
    }

    #[test]
    fn test_neoforge_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let jar = write_jar(
            dir.path(),
            "neo.jar",
            &[("META-INF/neoforge.mods.toml", "modId=\"neo\"\nversion=\"4.0\"\ndisplayName=\"Neo Mod\"\n")],
        );

        let record = read_mod_metadata(&jar);
        assert_eq!(record.loader_kind, LoaderKind::Forge);
        assert_eq!(record.display_name, "Neo Mod");
    }
}
