//! External collaborators: time-tracking source, task board, credentials.
//!
//! None of this is needed by the allocation or replay algorithms; it only
//! gathers their inputs and publishes their result.

pub mod todoist;
pub mod toggl;
pub mod traits;

pub use todoist::TodoistClient;
pub use toggl::TogglClient;
pub use traits::{BoardTask, TaskBoard, TimeSource};

use serde::Serialize;
use std::collections::HashMap;

use crate::allocation::PriorityTask;
use crate::error::IntegrationError;

/// Keyring key for the time-tracking API token.
pub const TOGGL_TOKEN_KEY: &str = "toggl_api_token";
/// Keyring key for the task-board API token.
pub const TODOIST_TOKEN_KEY: &str = "todoist_api_token";

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    use crate::error::IntegrationError;

    const SERVICE: &str = "timeshare";

    pub fn get(key: &str) -> Result<Option<String>, IntegrationError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), IntegrationError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), IntegrationError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Stored token for `service`, or `NotAuthenticated`.
    pub fn require(key: &str, service: &str) -> Result<String, IntegrationError> {
        get(key)?
            .filter(|token| !token.is_empty())
            .ok_or_else(|| IntegrationError::NotAuthenticated {
                service: service.to_string(),
            })
    }
}

/// Lookups of remote names and ids, owned by the caller.
///
/// Pass the same cache to repeated calls to avoid refetching; drop it to
/// start over.
#[derive(Debug, Clone, Default)]
pub struct NameCache {
    workspaces: HashMap<String, u64>,
    projects: HashMap<u64, String>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workspace_id(&self, name: &str) -> Option<u64> {
        self.workspaces.get(name).copied()
    }

    pub fn insert_workspace(&mut self, name: &str, id: u64) {
        self.workspaces.insert(name.to_string(), id);
    }

    pub fn project_name(&self, id: u64) -> Option<&str> {
        self.projects.get(&id).map(String::as_str)
    }

    pub fn insert_project(&mut self, id: u64, name: &str) {
        self.projects.insert(id, name.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty() && self.projects.is_empty()
    }
}

/// What a publish run changed on the board.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    pub removed: usize,
    pub created: BoardTask,
}

/// Replace previously generated tasks with `task`.
///
/// Every board task whose content starts with one of `activity_names` is
/// deleted before the new task is added.
///
/// # Errors
/// Returns the first board error; tasks deleted before it stay deleted.
pub async fn publish_priority<B: TaskBoard>(
    board: &B,
    task: &PriorityTask,
    activity_names: &[String],
    due_string: &str,
) -> Result<PublishOutcome, IntegrationError> {
    let existing = board.list_tasks().await?;

    let mut removed = 0;
    for stale in existing
        .iter()
        .filter(|t| crate::allocation::is_stale(&t.content, activity_names))
    {
        board.delete_task(&stale.id).await?;
        removed += 1;
    }

    let created = board.add_task(&task.title(), due_string).await?;
    tracing::info!(removed, task = %created.content, "published priority task");

    Ok(PublishOutcome { removed, created })
}

/// Send a request and decode a JSON body, mapping failures per service.
pub(crate) async fn send_json<T: serde::de::DeserializeOwned>(
    service: &str,
    request: reqwest::RequestBuilder,
) -> Result<T, IntegrationError> {
    let resp = checked(service, request).await?;
    resp.json()
        .await
        .map_err(|e| IntegrationError::http(service, e))
}

/// Send a request and require a success status.
pub(crate) async fn checked(
    service: &str,
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, IntegrationError> {
    let resp = request
        .send()
        .await
        .map_err(|e| IntegrationError::http(service, e))?;

    let status = resp.status();
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(IntegrationError::Api {
            service: service.to_string(),
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp)
}

/// Parse `base` as a URL usable with `Url::join` for relative paths.
pub(crate) fn base_url(base: &str) -> Result<url::Url, IntegrationError> {
    let mut url = url::Url::parse(base)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_cache() {
        let mut cache = NameCache::new();
        assert!(cache.is_empty());
        cache.insert_workspace("Personal", 42);
        cache.insert_project(7, "Reading");
        assert_eq!(cache.workspace_id("Personal"), Some(42));
        assert_eq!(cache.workspace_id("Work"), None);
        assert_eq!(cache.project_name(7), Some("Reading"));
        assert!(!cache.is_empty());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = base_url("http://127.0.0.1:1234").unwrap();
        assert_eq!(url.join("api/v9/me").unwrap().as_str(), "http://127.0.0.1:1234/api/v9/me");

        let url = base_url("http://host/prefix").unwrap();
        assert_eq!(url.join("x").unwrap().as_str(), "http://host/prefix/x");
    }
}
