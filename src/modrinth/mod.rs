//! Modrinth catalog integration
//!
//! The [`Catalog`] trait is the boundary to the remote service. Its methods
//! never fail: transport errors, non-success statuses and undecodable bodies
//! are logged and come back as "no data" (`None` or an empty list).

pub mod client;

pub use client::{CatalogError, ModrinthClient};

use async_trait::async_trait;
use serde::Deserialize;

/// Label used for release fields the service left out
pub const UNKNOWN_LABEL: &str = "Unknown";

fn unknown_label() -> String {
    UNKNOWN_LABEL.to_string()
}

/// One hit from the project search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectHit {
    pub project_id: String,
    #[serde(default, alias = "name")]
    pub title: Option<String>,
}

impl ProjectHit {
    pub fn title_or_id(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.project_id)
    }
}

/// Search endpoint response body
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<ProjectHit>,
}

/// One published version of a project
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteRelease {
    #[serde(default = "unknown_label")]
    pub version_number: String,
    /// Compatible game versions, in the order the service lists them
    #[serde(default, rename = "game_versions")]
    pub target_platform_versions: Vec<String>,
    /// ISO-8601 timestamp
    #[serde(default, rename = "date_published")]
    pub published_at: Option<String>,
}

impl RemoteRelease {
    pub fn new(version_number: impl Into<String>) -> Self {
        Self {
            version_number: version_number.into(),
            target_platform_versions: Vec::new(),
            published_at: None,
        }
    }

    /// Date part of `published_at` (`2024-05-01T10:00:00Z` -> `2024-05-01`)
    pub fn published_date(&self) -> &str {
        match self.published_at.as_deref() {
            Some(ts) => ts.split('T').next().unwrap_or(ts),
            None => UNKNOWN_LABEL,
        }
    }

    /// Comma-joined platform versions
    pub fn platform_versions_label(&self) -> String {
        if self.target_platform_versions.is_empty() {
            unknown_label()
        } else {
            self.target_platform_versions.join(", ")
        }
    }
}

/// Remote mod catalog
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Best (first) project matching a free-text name
    async fn search(&self, name: &str) -> Option<ProjectHit>;

    /// Releases of a project, newest first, optionally narrowed to one
    /// platform version
    async fn fetch_releases(
        &self,
        project_id: &str,
        platform_version: Option<&str>,
    ) -> Vec<RemoteRelease>;

    /// Whether the service answers at all
    async fn is_reachable(&self) -> bool;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory catalog keyed by search name
    #[derive(Default)]
    pub struct FakeCatalog {
        pub projects: HashMap<String, (ProjectHit, Vec<RemoteRelease>)>,
        /// (project_id, platform filter) for every release fetch
        pub release_queries: Mutex<Vec<(String, Option<String>)>>,
    }

    impl FakeCatalog {
        pub fn with_project(mut self, name: &str, project_id: &str, versions: &[&str]) -> Self {
            let hit = ProjectHit {
                project_id: project_id.to_string(),
                title: Some(name.to_string()),
            };
            let releases = versions.iter().map(|v| RemoteRelease::new(*v)).collect();
            self.projects.insert(name.to_string(), (hit, releases));
            self
        }

        pub fn queries(&self) -> Vec<(String, Option<String>)> {
            self.release_queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Catalog for FakeCatalog {
        async fn search(&self, name: &str) -> Option<ProjectHit> {
            self.projects.get(name).map(|(hit, _)| hit.clone())
        }

        async fn fetch_releases(
            &self,
            project_id: &str,
            platform_version: Option<&str>,
        ) -> Vec<RemoteRelease> {
            self.release_queries
                .lock()
                .unwrap()
                .push((project_id.to_string(), platform_version.map(str::to_string)));
            self.projects
                .values()
                .find(|(hit, _)| hit.project_id == project_id)
                .map(|(_, releases)| releases.clone())
                .unwrap_or_default()
        }

        async fn is_reachable(&self) -> bool {
            true
        }
    }
}
