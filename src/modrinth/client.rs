//! Modrinth REST v2 client

use super::{Catalog, ProjectHit, RemoteRelease, SearchResponse};
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.modrinth.com/v2";
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Why a request produced no data
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("connection failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// HTTP client for the Modrinth API
#[derive(Clone)]
pub struct ModrinthClient {
    client: Arc<reqwest::Client>,
    base_url: String,
    search_limit: u32,
}

impl ModrinthClient {
    /// Create a new client against `base_url` (no trailing slash needed)
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
        search_limit: u32,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
            search_limit: search_limit.max(1),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.api_base_url,
            &config.user_agent,
            Duration::from_secs(config.request_timeout_secs),
            config.search_limit,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search projects by name, returning every hit on the first page
    pub async fn search_projects(&self, query: &str) -> Result<Vec<ProjectHit>, CatalogError> {
        let url = format!("{}/search", self.base_url);
        let limit = self.search_limit.to_string();
        let response: SearchResponse = self
            .get_json(&url, &[("query", query), ("limit", limit.as_str())])
            .await?;
        Ok(response.hits)
    }

    /// List releases of a project
    pub async fn project_versions(
        &self,
        project_id: &str,
        game_version: Option<&str>,
    ) -> Result<Vec<RemoteRelease>, CatalogError> {
        let url = format!("{}/project/{}/version", self.base_url, project_id);

        // The API takes a JSON array: game_versions=["1.21.5"]
        let filter = game_version
            .filter(|v| !v.trim().is_empty())
            .map(|v| serde_json::json!([v.trim()]).to_string());

        match filter {
            Some(filter) => {
                self.get_json(&url, &[("game_versions", filter.as_str())])
                    .await
            }
            None => self.get_json(&url, &[]).await,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(CatalogError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status { status, body });
        }

        response.json::<T>().await.map_err(CatalogError::Decode)
    }
}

#[async_trait]
impl Catalog for ModrinthClient {
    async fn search(&self, name: &str) -> Option<ProjectHit> {
        match self.search_projects(name).await {
            Ok(hits) => hits.into_iter().next(),
            Err(e) => {
                tracing::warn!("Error searching mods for '{}': {}", name, e);
                None
            }
        }
    }

    async fn fetch_releases(
        &self,
        project_id: &str,
        platform_version: Option<&str>,
    ) -> Vec<RemoteRelease> {
        match self.project_versions(project_id, platform_version).await {
            Ok(releases) => releases,
            Err(e) => {
                tracing::warn!("Error getting mod versions for {}: {}", project_id, e);
                Vec::new()
            }
        }
    }

    async fn is_reachable(&self) -> bool {
        match self.client.get(&self.base_url).send().await {
            Ok(response) => {
                tracing::debug!("Connectivity check: {} -> {}", self.base_url, response.status());
                true
            }
            Err(e) => {
                tracing::error!("Connectivity check failed for {}: {}", self.base_url, e);
                false
            }
        }
    }
}
