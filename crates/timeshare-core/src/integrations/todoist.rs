//! Todoist integration -- the priority activity as a task due today.

use reqwest::Client;
use serde::Serialize;

use super::traits::{BoardTask, TaskBoard};
use super::{base_url, checked, keyring_store, send_json, TODOIST_TOKEN_KEY};
use crate::error::IntegrationError;

const SERVICE: &str = "todoist";
const DEFAULT_BASE_URL: &str = "https://api.todoist.com/";

#[derive(Debug, Serialize)]
struct NewTask<'a> {
    content: &'a str,
    due_string: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<&'a str>,
}

pub struct TodoistClient {
    client: Client,
    base_url: String,
    api_token: String,
    project_id: Option<String>,
}

impl TodoistClient {
    pub fn new(api_token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: api_token.to_string(),
            project_id: None,
        }
    }

    /// Build a client with the token stored in the OS keyring.
    ///
    /// # Errors
    /// Returns `NotAuthenticated` if no token is stored.
    pub fn from_keyring() -> Result<Self, IntegrationError> {
        let token = keyring_store::require(TODOIST_TOKEN_KEY, SERVICE)?;
        Ok(Self::new(&token))
    }

    /// Point the client at another host (used by tests).
    pub fn with_base_url(mut self, base: &str) -> Self {
        self.base_url = base.to_string();
        self
    }

    /// Restrict listing to, and create tasks in, one project.
    pub fn with_project(mut self, project_id: Option<String>) -> Self {
        self.project_id = project_id;
        self
    }

    fn request(&self, method: reqwest::Method, path: &str) -> Result<reqwest::RequestBuilder, IntegrationError> {
        let url = base_url(&self.base_url)?.join(path)?;
        Ok(self
            .client
            .request(method, url)
            .bearer_auth(&self.api_token))
    }
}

impl TaskBoard for TodoistClient {
    async fn list_tasks(&self) -> Result<Vec<BoardTask>, IntegrationError> {
        let mut request = self.request(reqwest::Method::GET, "rest/v2/tasks")?;
        if let Some(project_id) = &self.project_id {
            request = request.query(&[("project_id", project_id)]);
        }
        let tasks: Vec<BoardTask> = send_json(SERVICE, request).await?;
        tracing::debug!(count = tasks.len(), "listed board tasks");
        Ok(tasks)
    }

    async fn delete_task(&self, id: &str) -> Result<(), IntegrationError> {
        let request = self.request(reqwest::Method::DELETE, &format!("rest/v2/tasks/{id}"))?;
        checked(SERVICE, request).await?;
        tracing::info!(id, "deleted stale task");
        Ok(())
    }

    async fn add_task(&self, content: &str, due_string: &str) -> Result<BoardTask, IntegrationError> {
        let body = NewTask {
            content,
            due_string,
            project_id: self.project_id.as_deref(),
        };
        let request = self.request(reqwest::Method::POST, "rest/v2/tasks")?.json(&body);
        send_json(SERVICE, request).await
    }
}
