use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;

use super::NameCache;
use crate::allocation::TimeSpent;
use crate::error::IntegrationError;

/// Supplies total elapsed seconds per activity.
pub trait TimeSource {
    /// Seconds per activity since `since`, including a running entry when
    /// the source is configured to count it.
    fn time_spent_since(
        &self,
        since: DateTime<Utc>,
        cache: &mut NameCache,
    ) -> impl Future<Output = Result<TimeSpent, IntegrationError>> + Send;
}

/// A task as seen on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardTask {
    pub id: String,
    pub content: String,
}

/// Receives the priority task.
pub trait TaskBoard {
    fn list_tasks(&self) -> impl Future<Output = Result<Vec<BoardTask>, IntegrationError>> + Send;

    fn delete_task(&self, id: &str) -> impl Future<Output = Result<(), IntegrationError>> + Send;

    fn add_task(
        &self,
        content: &str,
        due_string: &str,
    ) -> impl Future<Output = Result<BoardTask, IntegrationError>> + Send;
}
