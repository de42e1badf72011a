//! Closed-form future allocation.
//!
//! Given how long has been spent on each activity and the desired shares,
//! find the shortest extra horizon after which cumulative time matches the
//! shares exactly, and how that extra time must be split.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{validate_shares, Activity, TargetShares, TimeSpent};
use crate::error::AllocationError;

/// Horizons at or below this fraction of the relevant time are rounding
/// noise from dividing by a share, not real catch-up time.
const HORIZON_NOISE: f64 = 1e-9;

/// Per-activity gaps (`share * total - spent`) at or below this fraction of
/// the total are rounding noise; the activity needs no extra time.
const GAP_NOISE: f64 = 1e-12;

/// Fractional split of future time, optionally bounded by a horizon.
///
/// Without `min_required_time_s` the allocation is the target shares
/// themselves. With it, the fractions apply to that many upcoming seconds
/// only and activities whose fraction is exactly zero are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub allocation: BTreeMap<Activity, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_required_time_s: Option<f64>,
}

impl AllocationPlan {
    fn steady(shares: &TargetShares) -> Self {
        Self {
            allocation: shares.as_map().clone(),
            min_required_time_s: None,
        }
    }

    /// Whether spending already matches (or exceeds) every target proportion.
    pub fn is_steady(&self) -> bool {
        self.min_required_time_s.is_none()
    }

    /// Allocation entries sorted by descending fraction, then by name.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self
            .allocation
            .iter()
            .map(|(a, f)| (a.as_str(), *f))
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Seconds of the horizon that go to `activity`, if a horizon exists.
    pub fn required_for(&self, activity: &str) -> Option<f64> {
        let horizon = self.min_required_time_s?;
        self.allocation.get(activity).map(|f| f * horizon)
    }
}

/// Validate `target_share` and compute the allocation plan.
///
/// # Errors
/// Returns [`AllocationError::InvalidTargetShare`] if the shares do not sum
/// to 1.0 or contain an explicit zero. No partial result is produced.
pub fn compute_allocation(
    current_time_spent: &TimeSpent,
    target_share: &BTreeMap<Activity, f64>,
) -> Result<AllocationPlan, AllocationError> {
    let shares = validate_shares(target_share)?;
    Ok(plan_allocation(current_time_spent, &shares))
}

/// Compute the allocation plan for already validated shares.
///
/// Activities outside the target set are ignored; target activities missing
/// from `current_time_spent` count as zero. The input map is never modified.
pub fn plan_allocation(current_time_spent: &TimeSpent, shares: &TargetShares) -> AllocationPlan {
    if current_time_spent.is_empty() {
        return AllocationPlan::steady(shares);
    }

    let spent = |act: &str| current_time_spent.get(act).copied().unwrap_or(0) as f64;

    let relevant_time_spent: f64 = shares.activities().map(spent).sum();

    // Horizon beyond the relevant total at which each activity's current
    // spend would exactly equal its share.
    let time_required = shares
        .iter()
        .map(|(act, share)| spent(act) / share - relevant_time_spent)
        .fold(0.0_f64, f64::max);

    if time_required <= relevant_time_spent * HORIZON_NOISE {
        return AllocationPlan::steady(shares);
    }

    let total_time = relevant_time_spent + time_required;
    let gap_noise = total_time * GAP_NOISE;

    let allocation = shares
        .iter()
        .filter_map(|(act, share)| {
            let gap = share * total_time - spent(act);
            (gap.abs() > gap_noise).then(|| (act.to_string(), gap / time_required))
        })
        .collect();

    AllocationPlan {
        allocation,
        min_required_time_s: Some(time_required),
    }
}
