//! Bulk update check running off the UI task
//!
//! The worker owns no UI state. It reports progress over a channel, one
//! event per mod, in the order the mods were listed.

use super::{classify_version, Classification, UpdateStatus};
use crate::modrinth::Catalog;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// One mod to check
#[derive(Debug, Clone)]
pub struct CheckJob {
    pub file_name: String,
    /// Name used for the catalog search
    pub display_name: String,
    /// Currently displayed local version
    pub current_version: Option<String>,
}

/// Progress reported by the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckEvent {
    /// Line for the activity log
    Log(String),
    /// A mod was matched and classified
    Checked {
        file_name: String,
        classification: Classification,
    },
    /// All jobs processed
    Finished { checked: usize, total: usize },
}

/// Start a bulk check on the runtime. Events go to `tx` until `Finished`.
pub fn spawn_update_check(
    catalog: Arc<dyn Catalog>,
    jobs: Vec<CheckJob>,
    platform_version: Option<String>,
    tx: UnboundedSender<CheckEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        run_update_check(catalog.as_ref(), jobs, platform_version.as_deref(), &tx).await;
    })
}

/// Check every job in order, returning how many were classified
pub async fn run_update_check(
    catalog: &dyn Catalog,
    jobs: Vec<CheckJob>,
    platform_version: Option<&str>,
    tx: &UnboundedSender<CheckEvent>,
) -> usize {
    let total = jobs.len();
    let mut checked = 0;

    // A closed channel only means the UI went away; finish quietly.
    let send = |event: CheckEvent| {
        let _ = tx.send(event);
    };

    for job in jobs {
        send(CheckEvent::Log(format!(
            "Searching for updates for: {}",
            job.display_name
        )));

        let Some(hit) = catalog.search(&job.display_name).await else {
            send(CheckEvent::Log(format!("No results found for {}", job.display_name)));
            continue;
        };
        send(CheckEvent::Log(format!(
            "Found mod: {} (ID: {})",
            hit.title_or_id(),
            hit.project_id
        )));

        let releases = catalog.fetch_releases(&hit.project_id, platform_version).await;
        let classification = classify_version(job.current_version.as_deref(), &releases);
        if classification.status == UpdateStatus::NotChecked {
            send(CheckEvent::Log(format!("No versions found for {}", job.display_name)));
            continue;
        }

        send(CheckEvent::Log(format!(
            "Latest version: {}",
            classification.latest_label()
        )));
        tracing::debug!(
            "{}: {} -> {}",
            job.file_name,
            job.current_version.as_deref().unwrap_or("?"),
            classification.status
        );

        checked += 1;
        send(CheckEvent::Checked {
            file_name: job.file_name,
            classification,
        });
    }

    send(CheckEvent::Log("Update check completed.".to_string()));
    send(CheckEvent::Finished { checked, total });
    checked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modrinth::test_support::FakeCatalog;
    use tokio::sync::mpsc;

    fn job(file_name: &str, name: &str, version: Option<&str>) -> CheckJob {
        CheckJob {
            file_name: file_name.to_string(),
            display_name: name.to_string(),
            current_version: version.map(str::to_string),
        }
    }

    fn checked_events(events: &[CheckEvent]) -> Vec<(String, UpdateStatus)> {
        events
            .iter()
            .filter_map(|e| match e {
                CheckEvent::Checked {
                    file_name,
                    classification,
                } => Some((file_name.clone(), classification.status)),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_events_follow_job_order() {
        let catalog = Arc::new(
            FakeCatalog::default()
                .with_project("Alpha", "a1", &["2.0"])
                .with_project("Beta", "b1", &["1.0"]),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = spawn_update_check(
            catalog.clone(),
            vec![
                job("alpha.jar", "Alpha", Some("1.0")),
                job("missing.jar", "Missing", Some("1.0")),
                job("beta.jar", "Beta", Some("1.0")),
            ],
            Some("1.21.5".to_string()),
            tx,
        );
        handle.await.unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }

        assert_eq!(
            checked_events(&events),
            vec![
                ("alpha.jar".to_string(), UpdateStatus::UpdateAvailable),
                ("beta.jar".to_string(), UpdateStatus::UpToDate),
            ]
        );
        assert!(events.contains(&CheckEvent::Log("No results found for Missing".to_string())));
        assert_eq!(
            events.last(),
            Some(&CheckEvent::Finished { checked: 2, total: 3 })
        );
        assert!(catalog
            .queries()
            .iter()
            .all(|(_, filter)| filter.as_deref() == Some("1.21.5")));
    }

    #[tokio::test]
    async fn test_empty_release_list_is_skipped() {
        let catalog = FakeCatalog::default().with_project("Gamma", "g1", &[]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let checked = run_update_check(&catalog, vec![job("gamma.jar", "Gamma", None)], None, &tx).await;
        assert_eq!(checked, 0);

        let mut saw_no_versions = false;
        while let Ok(event) = rx.try_recv() {
            assert!(!matches!(event, CheckEvent::Checked { .. }));
            if event == CheckEvent::Log("No versions found for Gamma".to_string()) {
                saw_no_versions = true;
            }
        }
        assert!(saw_no_versions);
    }

    #[tokio::test]
    async fn test_closed_channel_does_not_panic() {
        let catalog = FakeCatalog::default().with_project("Alpha", "a1", &["2.0"]);
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let checked = run_update_check(&catalog, vec![job("alpha.jar", "Alpha", Some("2.0"))], None, &tx).await;
        assert_eq!(checked, 1);
    }
}
