//! Time-spent ingestion.
//!
//! Everything entering the core is converted to whole seconds here:
//! - `{activity: seconds}` snapshots for the allocation plan
//! - `[[activity, seconds], ...]` event lists for the replay engine
//! - raw tracker entries (milliseconds, optional project) aggregated per project

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::allocation::TimeSpent;
use crate::error::InputError;
use crate::replay::SpendEvent;

/// A single entry as reported by a time-tracking service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedEntry {
    /// Project the entry was booked against, if any.
    pub project: Option<String>,
    /// Elapsed time in milliseconds.
    pub duration_ms: u64,
}

impl TrackedEntry {
    pub fn new(project: Option<&str>, duration_ms: u64) -> Self {
        Self {
            project: project.map(str::to_string),
            duration_ms,
        }
    }
}

pub(crate) fn read_input(path: &Path) -> Result<String, InputError> {
    std::fs::read_to_string(path).map_err(|source| InputError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn malformed(path: &Path, err: impl std::fmt::Display) -> InputError {
    InputError::Malformed {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Load a `{activity: seconds}` JSON snapshot.
///
/// Fractional seconds are truncated.
///
/// # Errors
/// Returns an error if the file cannot be read, is not an object of
/// numbers, or holds a negative duration.
pub fn load_time_spent(path: &Path) -> Result<TimeSpent, InputError> {
    let content = read_input(path)?;
    let raw: BTreeMap<String, f64> =
        serde_json::from_str(&content).map_err(|e| malformed(path, e))?;

    let mut spent = TimeSpent::new();
    for (activity, secs) in raw {
        if secs < 0.0 {
            return Err(InputError::NegativeDuration { activity });
        }
        spent.insert(activity, secs as u64);
    }

    tracing::debug!(path = %path.display(), activities = spent.len(), "loaded time spent");
    Ok(spent)
}

/// Load a chronological `[[activity, seconds], ...]` JSON event list.
///
/// # Errors
/// Returns an error if the file cannot be read or any pair is malformed.
pub fn load_events(path: &Path) -> Result<Vec<SpendEvent>, InputError> {
    let content = read_input(path)?;
    let events: Vec<SpendEvent> =
        serde_json::from_str(&content).map_err(|e| malformed(path, e))?;
    tracing::debug!(path = %path.display(), events = events.len(), "loaded events");
    Ok(events)
}

/// Sum tracker entries per project in whole seconds.
///
/// Each entry is truncated to seconds before summing. Entries without a
/// project are skipped.
pub fn aggregate_entries<'a, I>(entries: I) -> TimeSpent
where
    I: IntoIterator<Item = &'a TrackedEntry>,
{
    let mut spent = TimeSpent::new();
    for entry in entries {
        match entry.project.as_deref() {
            Some(project) if !project.is_empty() => {
                *spent.entry(project.to_string()).or_insert(0) += entry.duration_ms / 1000;
            }
            _ => {
                tracing::warn!(duration_ms = entry.duration_ms, "skipping entry without project");
            }
        }
    }
    spent
}
