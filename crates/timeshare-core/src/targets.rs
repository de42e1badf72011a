//! Weight-source ingestion.
//!
//! Targets arrive either as integer scores (a JSON map or a two-column sheet
//! export) or as already normalized fractions. Both end up as
//! [`TargetShares`] through the same validation.

use std::collections::BTreeMap;
use std::path::Path;

use crate::allocation::{drop_zero_shares, normalize, validate_shares, Activity, Scores, TargetShares};
use crate::error::{AllocationError, InputError};
use crate::history::{malformed, read_input};

/// How a target file should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetKind {
    /// Integer points per activity
    #[default]
    Scores,
    /// Fractions that already sum to one
    Shares,
}

/// Target weights before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetInput {
    Scores(Scores),
    Shares(BTreeMap<Activity, f64>),
}

impl TargetInput {
    /// Funnel either form into validated shares.
    ///
    /// Zero entries are dropped on both paths before validation.
    ///
    /// # Errors
    /// [`AllocationError::InvalidWeights`] for all-zero scores,
    /// [`AllocationError::InvalidTargetShare`] for unusable fractions.
    pub fn into_shares(self) -> Result<TargetShares, AllocationError> {
        match self {
            TargetInput::Scores(scores) => normalize(&scores),
            TargetInput::Shares(shares) => validate_shares(&drop_zero_shares(&shares)),
        }
    }

    /// Every named activity, zero-weighted ones included.
    pub fn activity_names(&self) -> Vec<Activity> {
        match self {
            TargetInput::Scores(scores) => scores.keys().cloned().collect(),
            TargetInput::Shares(shares) => shares.keys().cloned().collect(),
        }
    }
}

/// Load a target file as the given kind.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_target(path: &Path, kind: TargetKind) -> Result<TargetInput, InputError> {
    match kind {
        TargetKind::Scores => load_scores(path).map(TargetInput::Scores),
        TargetKind::Shares => load_shares(path).map(TargetInput::Shares),
    }
}

/// Load integer scores from a JSON map, or from a sheet export when the file
/// has a `.csv` extension.
///
/// # Errors
/// Returns an error if the file cannot be read or a score is not a
/// non-negative integer.
pub fn load_scores(path: &Path) -> Result<Scores, InputError> {
    let content = read_input(path)?;
    let is_sheet = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let scores = if is_sheet {
        parse_score_sheet(&content)?
    } else {
        serde_json::from_str(&content).map_err(|e| malformed(path, e))?
    };

    tracing::debug!(path = %path.display(), activities = scores.len(), "loaded target scores");
    Ok(scores)
}

/// Load `{activity: fraction}` JSON.
///
/// # Errors
/// Returns an error if the file cannot be read or is not an object of numbers.
pub fn load_shares(path: &Path) -> Result<BTreeMap<Activity, f64>, InputError> {
    let content = read_input(path)?;
    let shares: BTreeMap<Activity, f64> =
        serde_json::from_str(&content).map_err(|e| malformed(path, e))?;
    tracing::debug!(path = %path.display(), activities = shares.len(), "loaded target shares");
    Ok(shares)
}

/// Parse a two-column sheet export: a header row, then `name,score` rows.
///
/// Blank rows and rows without a name are skipped. A repeated name keeps the
/// last score.
///
/// # Errors
/// Returns [`InputError::InvalidScore`] for a score that is not a
/// non-negative integer.
pub fn parse_score_sheet(content: &str) -> Result<Scores, InputError> {
    let mut scores = Scores::new();

    for (idx, row) in content.lines().enumerate().skip(1) {
        let line = idx + 1;
        if row.trim().is_empty() {
            continue;
        }

        let mut cells = row.splitn(3, ',').map(|c| c.trim().trim_matches('"').trim());
        let name = cells.next().unwrap_or_default();
        let score = cells.next().unwrap_or_default();

        if name.is_empty() {
            tracing::warn!(line, "skipping sheet row without an activity name");
            continue;
        }

        let score: u64 = score.parse().map_err(|e| InputError::InvalidScore {
            line,
            message: format!("'{score}' for '{name}': {e}"),
        })?;

        if scores.insert(name.to_string(), score).is_some() {
            tracing::warn!(line, activity = name, "activity listed twice, keeping the later score");
        }
    }

    Ok(scores)
}
