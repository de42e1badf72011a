//! Toggl Track integration -- elapsed time per project via the reports API.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use super::traits::TimeSource;
use super::{base_url, keyring_store, send_json, NameCache, TOGGL_TOKEN_KEY};
use crate::allocation::TimeSpent;
use crate::error::IntegrationError;
use crate::history::{aggregate_entries, TrackedEntry};

const SERVICE: &str = "toggl";
const DEFAULT_BASE_URL: &str = "https://api.track.toggl.com/";
const USER_AGENT: &str = "timeshare";

#[derive(Debug, Deserialize)]
struct Workspace {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct DetailsPage {
    total_count: u64,
    per_page: u64,
    #[serde(default)]
    data: Vec<DetailsEntry>,
}

#[derive(Debug, Deserialize)]
struct DetailsEntry {
    project: Option<String>,
    dur: u64,
}

#[derive(Debug, Deserialize)]
struct RunningEntry {
    workspace_id: u64,
    project_id: Option<u64>,
    start: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct Project {
    name: String,
}

/// Reads tracked time for one workspace.
pub struct TogglClient {
    client: Client,
    base_url: String,
    api_token: String,
    workspace_name: String,
    include_running: bool,
}

impl TogglClient {
    pub fn new(api_token: &str, workspace_name: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: api_token.to_string(),
            workspace_name: workspace_name.to_string(),
            include_running: true,
        }
    }

    /// Build a client with the token stored in the OS keyring.
    ///
    /// # Errors
    /// Returns `NotAuthenticated` if no token is stored.
    pub fn from_keyring(workspace_name: &str) -> Result<Self, IntegrationError> {
        let token = keyring_store::require(TOGGL_TOKEN_KEY, SERVICE)?;
        Ok(Self::new(&token, workspace_name))
    }

    /// Point the client at another host (used by tests).
    pub fn with_base_url(mut self, base: &str) -> Self {
        self.base_url = base.to_string();
        self
    }

    pub fn with_running_entry(mut self, include: bool) -> Self {
        self.include_running = include;
        self
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, IntegrationError> {
        let url = base_url(&self.base_url)?.join(path)?;
        let request = self
            .client
            .get(url)
            .basic_auth(&self.api_token, Some("api_token"))
            .query(query);
        send_json(SERVICE, request).await
    }

    /// Resolve the configured workspace name to its id.
    ///
    /// # Errors
    /// Returns `NotFound` if no workspace has that name.
    pub async fn workspace_id(&self, cache: &mut NameCache) -> Result<u64, IntegrationError> {
        if let Some(id) = cache.workspace_id(&self.workspace_name) {
            return Ok(id);
        }

        let workspaces: Vec<Workspace> = self.get("api/v9/me/workspaces", &[]).await?;
        for ws in &workspaces {
            cache.insert_workspace(&ws.name, ws.id);
        }

        cache
            .workspace_id(&self.workspace_name)
            .ok_or_else(|| IntegrationError::NotFound {
                service: SERVICE.to_string(),
                what: format!("workspace '{}'", self.workspace_name),
            })
    }

    /// All finished entries since `since`, following report pagination.
    ///
    /// # Errors
    /// Returns an error if any page request fails.
    pub async fn report_entries(
        &self,
        workspace_id: u64,
        since: DateTime<Utc>,
    ) -> Result<Vec<TrackedEntry>, IntegrationError> {
        let mut entries = Vec::new();
        let mut page = 0u64;

        loop {
            page += 1;
            let query = [
                ("workspace_id", workspace_id.to_string()),
                ("since", since.format("%Y-%m-%d").to_string()),
                ("user_agent", USER_AGENT.to_string()),
                ("page", page.to_string()),
            ];
            let details: DetailsPage = self.get("reports/api/v2/details", &query).await?;
            tracing::debug!(
                page,
                total = details.total_count,
                received = details.data.len(),
                "fetched report page"
            );

            let received = details.data.len();
            entries.extend(
                details
                    .data
                    .into_iter()
                    .map(|e| TrackedEntry::new(e.project.as_deref(), e.dur)),
            );

            if received == 0
                || details.per_page == 0
                || page * details.per_page >= details.total_count
            {
                break;
            }
        }

        Ok(entries)
    }

    /// The in-progress entry as elapsed-so-far, if one is running in the
    /// workspace.
    ///
    /// # Errors
    /// Returns an error if the current entry or its project cannot be fetched.
    pub async fn running_entry(
        &self,
        workspace_id: u64,
        cache: &mut NameCache,
        now: DateTime<Utc>,
    ) -> Result<Option<TrackedEntry>, IntegrationError> {
        let current: Option<RunningEntry> =
            self.get("api/v9/me/time_entries/current", &[]).await?;

        let Some(running) = current.filter(|r| r.workspace_id == workspace_id) else {
            return Ok(None);
        };

        let elapsed_ms = (now - running.start).num_milliseconds().max(0) as u64;
        let project = match running.project_id {
            Some(pid) => Some(self.project_name(workspace_id, pid, cache).await?),
            None => None,
        };

        Ok(Some(TrackedEntry {
            project,
            duration_ms: elapsed_ms,
        }))
    }

    async fn project_name(
        &self,
        workspace_id: u64,
        project_id: u64,
        cache: &mut NameCache,
    ) -> Result<String, IntegrationError> {
        if let Some(name) = cache.project_name(project_id) {
            return Ok(name.to_string());
        }

        let path = format!("api/v9/workspaces/{workspace_id}/projects/{project_id}");
        let project: Project = self.get(&path, &[]).await?;
        cache.insert_project(project_id, &project.name);
        Ok(project.name)
    }
}

impl TimeSource for TogglClient {
    async fn time_spent_since(
        &self,
        since: DateTime<Utc>,
        cache: &mut NameCache,
    ) -> Result<TimeSpent, IntegrationError> {
        let workspace_id = self.workspace_id(cache).await?;
        let mut entries = self.report_entries(workspace_id, since).await?;

        if self.include_running {
            if let Some(running) = self.running_entry(workspace_id, cache, Utc::now()).await? {
                tracing::debug!(project = ?running.project, "including running entry");
                entries.push(running);
            }
        }

        Ok(aggregate_entries(&entries))
    }
}
