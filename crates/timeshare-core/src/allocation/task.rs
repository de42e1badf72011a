//! The single actionable task derived from an allocation plan.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{Activity, AllocationPlan};

/// Highest-priority activity and, when the plan has a horizon, how long to
/// spend on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityTask {
    pub activity: Activity,
    pub required_s: Option<f64>,
}

impl PriorityTask {
    /// Pick the activity with the largest fraction. Ties go to the smallest
    /// name. Returns `None` for an empty allocation.
    pub fn from_plan(plan: &AllocationPlan) -> Option<Self> {
        let (activity, _) = plan.ranked().into_iter().next()?;
        Some(Self {
            activity: activity.to_string(),
            required_s: plan.required_for(activity),
        })
    }

    /// Required time truncated to whole seconds.
    pub fn required(&self) -> Option<Duration> {
        self.required_s
            .map(|secs| Duration::seconds(secs.max(0.0) as i64))
    }

    /// Task content, e.g. `"Reading (2h 5m)"`.
    pub fn title(&self) -> String {
        match self.required() {
            Some(req) => format!(
                "{} ({}h {}m)",
                self.activity,
                req.num_hours(),
                req.num_minutes() % 60
            ),
            None => self.activity.clone(),
        }
    }
}

/// Whether board content was generated for one of `activity_names`.
pub fn is_stale<S: AsRef<str>>(content: &str, activity_names: &[S]) -> bool {
    activity_names
        .iter()
        .any(|name| !name.as_ref().is_empty() && content.starts_with(name.as_ref()))
}
