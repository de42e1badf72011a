//! Proportional-share allocation of future time.
//!
//! This module provides:
//! - Normalization of integer scores into target shares
//! - Validation of directly supplied fractional shares
//! - The closed-form future allocation plan for a time-spent snapshot
//! - Derivation of the single priority task published to a task board

use std::collections::BTreeMap;

mod plan;
mod task;
mod weights;

pub use plan::{compute_allocation, plan_allocation, AllocationPlan};
pub use task::{is_stale, PriorityTask};
pub use weights::{drop_zero_shares, normalize, validate_shares, TargetShares, SHARE_TOLERANCE};

/// A named unit of time allocation.
pub type Activity = String;

/// Accumulated seconds per activity. Absent activities count as zero.
pub type TimeSpent = BTreeMap<Activity, u64>;

/// Relative priority per activity. Zero excludes the activity.
pub type Scores = BTreeMap<Activity, u64>;
