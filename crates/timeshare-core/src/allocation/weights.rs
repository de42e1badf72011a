//! Target share derivation and validation.
//!
//! Two ingestion paths end in the same [`TargetShares`] value:
//! - [`normalize`] for integer scores (zero scores are dropped)
//! - [`validate_shares`] for already-fractional input
//!
//! A `TargetShares` can only be built through one of them, so anything that
//! accepts it can rely on the shares being positive and summing to one.

use serde::Serialize;
use std::collections::BTreeMap;

use super::{Activity, Scores};
use crate::error::AllocationError;

/// Absolute tolerance for "sums to 1.0" checks.
pub const SHARE_TOLERANCE: f64 = 1e-4;

/// Validated desired fraction of relevant time per activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TargetShares(BTreeMap<Activity, f64>);

impl TargetShares {
    /// Share for an activity, `None` if it is outside the target set.
    pub fn get(&self, activity: &str) -> Option<f64> {
        self.0.get(activity).copied()
    }

    pub fn contains(&self, activity: &str) -> bool {
        self.0.contains_key(activity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(a, s)| (a.as_str(), *s))
    }

    pub fn activities(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<Activity, f64> {
        &self.0
    }

    pub fn into_map(self) -> BTreeMap<Activity, f64> {
        self.0
    }
}

/// Turn integer scores into target shares.
///
/// Every activity with a positive score gets `score / total`; zero-score
/// activities are left out of the result entirely.
///
/// # Errors
/// Returns [`AllocationError::InvalidWeights`] if all scores sum to zero.
pub fn normalize(scores: &Scores) -> Result<TargetShares, AllocationError> {
    let total = scores.values().fold(0u64, |acc, s| acc.saturating_add(*s));
    if total == 0 {
        return Err(AllocationError::InvalidWeights { total });
    }

    let shares = scores
        .iter()
        .filter(|&(_, &score)| score > 0)
        .map(|(act, &score)| (act.clone(), score as f64 / total as f64))
        .collect();

    Ok(TargetShares(shares))
}

/// Accept a directly supplied share map.
///
/// Zero entries are rejected here, so callers that want them ignored must
/// pass the map through [`drop_zero_shares`] first.
///
/// # Errors
/// Returns [`AllocationError::InvalidTargetShare`] if the map is empty,
/// holds a zero, negative or non-finite share, or does not sum to 1.0
/// within [`SHARE_TOLERANCE`].
pub fn validate_shares(shares: &BTreeMap<Activity, f64>) -> Result<TargetShares, AllocationError> {
    if shares.is_empty() {
        return Err(AllocationError::share("no activities supplied"));
    }

    for (act, &share) in shares {
        if !share.is_finite() || share < 0.0 {
            return Err(AllocationError::share(format!(
                "share for '{act}' must be a finite non-negative number, got {share}"
            )));
        }
        if share == 0.0 {
            return Err(AllocationError::share(format!(
                "share for '{act}' is zero"
            )));
        }
    }

    let sum: f64 = shares.values().sum();
    if (sum - 1.0).abs() > SHARE_TOLERANCE {
        return Err(AllocationError::share(format!(
            "shares sum to {sum}, expected 1.0"
        )));
    }

    Ok(TargetShares(shares.clone()))
}

/// Copy of `shares` without explicit zero entries.
pub fn drop_zero_shares(shares: &BTreeMap<Activity, f64>) -> BTreeMap<Activity, f64> {
    shares
        .iter()
        .filter(|&(_, &s)| s != 0.0)
        .map(|(a, s)| (a.clone(), *s))
        .collect()
}
