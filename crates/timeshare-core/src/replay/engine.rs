//! Chronological replay of time-spend events into a rotating priority list.
//!
//! The engine walks activities in weight-descending order. After every event
//! it measures, for each activity, how far its spend is from the spend it
//! would have at the pace of the activity furthest ahead of its share. The
//! current priority moves on once it has received more time than it was
//! owed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::cycle::PriorityCycle;
use crate::allocation::{normalize, Activity, Scores};

/// One tracked block of time: `(activity, seconds)`.
///
/// Serializes as a two-element array, e.g. `["Reading", 1800]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendEvent(pub Activity, pub u64);

impl SpendEvent {
    pub fn new(activity: impl Into<Activity>, duration_s: u64) -> Self {
        Self(activity.into(), duration_s)
    }
}

/// Remaining seconds an activity needs to be on par with the others.
///
/// Serializes as `[activity, deficit_seconds]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deficit(pub Activity, pub f64);

impl Deficit {
    pub fn activity(&self) -> &str {
        &self.0
    }

    pub fn seconds(&self) -> f64 {
        self.1
    }
}

/// Incremental replay state for one goal.
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    cycle: PriorityCycle<Activity>,
    index_of: HashMap<Activity, usize>,
    scores: Vec<u64>,
    score_total: u64,
    shares: Vec<f64>,
    cumulative: Vec<u64>,
    deficit: Vec<f64>,
    total: u64,
    pointer: usize,
}

impl ReplayEngine {
    /// Build an engine for `goal`. Returns `None` when no activity has a
    /// positive score.
    pub fn new(goal: &Scores) -> Option<Self> {
        let targets = normalize(goal).ok()?;
        let cycle = PriorityCycle::by_weight(goal);

        let scores: Vec<u64> = cycle
            .as_slice()
            .iter()
            .map(|act| goal.get(act).copied().unwrap_or_default())
            .collect();
        let score_total = scores.iter().fold(0u64, |acc, s| acc.saturating_add(*s));
        let shares: Vec<f64> = cycle
            .as_slice()
            .iter()
            .map(|act| targets.get(act).unwrap_or_default())
            .collect();
        let index_of = cycle
            .as_slice()
            .iter()
            .enumerate()
            .map(|(i, act)| (act.clone(), i))
            .collect();
        let len = cycle.len();

        Some(Self {
            cycle,
            index_of,
            scores,
            score_total,
            shares,
            cumulative: vec![0; len],
            deficit: vec![0.0; len],
            total: 0,
            pointer: 0,
        })
    }

    /// Apply one event. Activities outside the goal are ignored.
    pub fn record(&mut self, activity: &str, duration_s: u64) {
        let Some(&idx) = self.index_of.get(activity) else {
            return;
        };

        self.cumulative[idx] = self.cumulative[idx].saturating_add(duration_s);
        self.total = self.total.saturating_add(duration_s);
        if self.total == 0 {
            return;
        }

        let ahead = self.most_ahead();

        if self.cumulative[self.pointer] as f64 > self.deficit[self.pointer] {
            self.pointer = self.cycle.advance(self.pointer);
        }

        let ahead_spent = self.cumulative[ahead] as f64;
        let ahead_share = self.shares[ahead];
        for i in 0..self.cycle.len() {
            let paced = ahead_spent * (self.shares[i] / ahead_share);
            // Absolute gap: activities ahead of pace also report a need.
            self.deficit[i] = (paced - self.cumulative[i] as f64).abs();
        }
    }

    /// Activity currently owed attention.
    pub fn current_priority(&self) -> &str {
        self.cycle
            .get(self.pointer)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Seconds replayed so far across goal activities.
    pub fn total_time_spent(&self) -> u64 {
        self.total
    }

    /// Finish the replay: every goal activity with its deficit, starting at
    /// the current priority and wrapping through weight order.
    pub fn into_priorities(mut self) -> Vec<Deficit> {
        if self.total > 0 && self.deficit[self.pointer] == 0.0 {
            self.pointer = self.cycle.advance(self.pointer);
        }

        self.cycle
            .rotate_from(self.pointer)
            .into_iter()
            .map(|act| {
                let deficit = self.deficit[self.index_of[&act]];
                Deficit(act, deficit)
            })
            .collect()
    }

    /// Index of the activity whose proportion exceeds its share the most.
    /// Ties go to the earliest activity in weight order.
    ///
    /// Overshoot `cum/total - score/score_total` is compared scaled by
    /// `total * score_total`, in integers, so equal overshoots tie exactly.
    fn most_ahead(&self) -> usize {
        let total = u128::from(self.total);
        let score_total = u128::from(self.score_total);
        let overshoot = |i: usize| {
            (u128::from(self.cumulative[i]) * score_total)
                .saturating_sub(u128::from(self.scores[i]) * total)
        };

        let mut best = 0;
        let mut best_overshoot = overshoot(0);
        for i in 1..self.cycle.len() {
            let value = overshoot(i);
            if value > best_overshoot {
                best = i;
                best_overshoot = value;
            }
        }
        best
    }
}

/// Replay `history` against `goal` and return the rotated deficit list.
///
/// Returns `None` if the goal is empty (or has no positive score). Events for
/// activities outside the goal are skipped.
pub fn replay(goal: &Scores, history: &[SpendEvent]) -> Option<Vec<Deficit>> {
    let mut engine = ReplayEngine::new(goal)?;
    for SpendEvent(activity, duration_s) in history {
        engine.record(activity, *duration_s);
    }
    Some(engine.into_priorities())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(pairs: &[(&str, u64)]) -> Scores {
        pairs.iter().map(|(a, s)| (a.to_string(), *s)).collect()
    }

    fn events(pairs: &[(&str, u64)]) -> Vec<SpendEvent> {
        pairs.iter().map(|(a, d)| SpendEvent::new(*a, *d)).collect()
    }

    fn deficits(pairs: &[(&str, f64)]) -> Vec<Deficit> {
        pairs.iter().map(|(a, d)| Deficit(a.to_string(), *d)).collect()
    }

    #[test]
    fn test_replay_no_goal() {
        assert_eq!(replay(&Scores::new(), &[]), None);
    }

    #[test]
    fn test_replay_no_past() {
        assert_eq!(
            replay(&goal(&[("A", 3), ("B", 2)]), &[]),
            Some(deficits(&[("A", 0.0), ("B", 0.0)]))
        );
        assert_eq!(
            replay(&goal(&[("X", 4), ("Y", 5)]), &[]),
            Some(deficits(&[("Y", 0.0), ("X", 0.0)]))
        );
        assert_eq!(
            replay(&goal(&[("P", 7)]), &[]),
            Some(deficits(&[("P", 0.0)]))
        );
    }

    #[test]
    fn test_replay_equal_weights() {
        let result = replay(&goal(&[("A", 1), ("B", 1)]), &events(&[("A", 2), ("B", 1)]));
        assert_eq!(result, Some(deficits(&[("B", 1.0), ("A", 0.0)])));

        let result = replay(&goal(&[("A", 1), ("B", 1)]), &events(&[("A", 1), ("B", 2)]));
        assert_eq!(result, Some(deficits(&[("A", 1.0), ("B", 0.0)])));
    }

    #[test]
    fn test_replay_not_started_activities() {
        let g = goal(&[("A", 1), ("B", 1), ("C", 1), ("D", 1), ("E", 1), ("F", 1)]);
        let result = replay(&g, &events(&[("B", 1), ("A", 20), ("B", 20), ("C", 10)]));
        assert_eq!(
            result,
            Some(deficits(&[
                ("C", 11.0),
                ("D", 21.0),
                ("E", 21.0),
                ("F", 21.0),
                ("A", 1.0),
                ("B", 0.0),
            ]))
        );
    }

    #[test]
    fn test_replay_four_way() {
        let g = goal(&[("A", 1), ("B", 1), ("C", 1), ("D", 1)]);
        let result = replay(&g, &events(&[("A", 1), ("B", 1), ("C", 3), ("D", 2)]));
        assert_eq!(
            result,
            Some(deficits(&[("D", 1.0), ("A", 2.0), ("B", 2.0), ("C", 0.0)]))
        );
    }

    #[test]
    fn test_replay_out_of_order_start() {
        let g = goal(&[("A", 1), ("B", 1), ("C", 1)]);
        let result = replay(&g, &events(&[("C", 1)]));
        assert_eq!(
            result,
            Some(deficits(&[("A", 1.0), ("B", 1.0), ("C", 0.0)]))
        );
    }

    #[test]
    fn test_replay_two_cycles() {
        let g = goal(&[("A", 1), ("B", 1), ("C", 1), ("D", 1)]);
        let result = replay(
            &g,
            &events(&[("A", 2), ("B", 2), ("C", 2), ("A", 1), ("B", 1)]),
        );
        assert_eq!(
            result,
            Some(deficits(&[("D", 3.0), ("A", 0.0), ("B", 0.0), ("C", 1.0)]))
        );
    }

    #[test]
    fn test_replay_tied_overshoot_goes_to_heavier_activity() {
        // After (A, 10), A and C both sit exactly 1/6 above their shares.
        let g = goal(&[("A", 3), ("B", 2), ("C", 1)]);
        let result = replay(&g, &events(&[("C", 5), ("A", 10), ("B", 0)])).unwrap();

        let names: Vec<&str> = result.iter().map(Deficit::activity).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
        let expected = [20.0 / 3.0, 5.0 / 3.0, 0.0];
        for (deficit, want) in result.iter().zip(expected) {
            assert!(
                (deficit.seconds() - want).abs() < 1e-9,
                "{}: expected {want}, got {}",
                deficit.activity(),
                deficit.seconds()
            );
        }
    }

    #[test]
    fn test_replay_ignores_unknown_activities() {
        let g = goal(&[("A", 1), ("B", 1)]);
        let with_noise = replay(&g, &events(&[("Z", 50), ("A", 2), ("Q", 9), ("B", 1)]));
        let without = replay(&g, &events(&[("A", 2), ("B", 1)]));
        assert_eq!(with_noise, without);
    }

    #[test]
    fn test_replay_excludes_zero_weight() {
        let g = goal(&[("A", 2), ("B", 0), ("C", 1)]);
        let result = replay(&g, &events(&[("B", 100)])).unwrap();
        let names: Vec<&str> = result.iter().map(Deficit::activity).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert!(result.iter().all(|d| d.seconds() == 0.0));
    }

    #[test]
    fn test_replay_all_zero_weights_is_no_result() {
        assert_eq!(replay(&goal(&[("A", 0)]), &events(&[("A", 5)])), None);
    }

    #[test]
    fn test_replay_zero_duration_events() {
        let g = goal(&[("A", 1), ("B", 1)]);
        let result = replay(&g, &events(&[("A", 0), ("B", 0)]));
        assert_eq!(result, Some(deficits(&[("A", 0.0), ("B", 0.0)])));
    }

    #[test]
    fn test_engine_tracks_current_priority() {
        let g = goal(&[("A", 1), ("B", 1), ("C", 1)]);
        let mut engine = ReplayEngine::new(&g).unwrap();
        assert_eq!(engine.current_priority(), "A");
        engine.record("A", 5);
        assert_eq!(engine.current_priority(), "B");
        assert_eq!(engine.total_time_spent(), 5);
    }

    #[test]
    fn test_weighted_deficits_scale_with_share() {
        let g = goal(&[("A", 2), ("B", 1)]);
        let result = replay(&g, &events(&[("B", 10)])).unwrap();
        // B is furthest ahead; at B's pace A should have 20 seconds.
        let a = result.iter().find(|d| d.activity() == "A").unwrap();
        assert!((a.seconds() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_deficit_serializes_as_pair() {
        let json = serde_json::to_string(&Deficit("A".to_string(), 11.0)).unwrap();
        assert_eq!(json, r#"["A",11.0]"#);
        let event: SpendEvent = serde_json::from_str(r#"["B", 20]"#).unwrap();
        assert_eq!(event, SpendEvent::new("B", 20));
    }
}
