//! Property tests for share normalization, allocation plans and replay.

use proptest::prelude::*;
use std::collections::BTreeMap;
use timeshare_core::{compute_allocation, normalize, plan_allocation, replay, Scores, SpendEvent, TimeSpent};

fn scores_strategy() -> impl Strategy<Value = Scores> {
    prop::collection::btree_map("[a-f]{1,3}", 0u64..50, 1..8)
        .prop_filter("needs a positive score", |s| s.values().any(|&v| v > 0))
}

fn spent_strategy() -> impl Strategy<Value = TimeSpent> {
    prop::collection::btree_map("[a-h]{1,3}", 0u64..200_000, 0..10)
}

fn events_strategy() -> impl Strategy<Value = Vec<SpendEvent>> {
    prop::collection::vec(
        ("[a-h]{1,3}", 0u64..10_000).prop_map(|(a, d)| SpendEvent(a, d)),
        0..30,
    )
}

proptest! {
    #[test]
    fn normalized_shares_sum_to_one(scores in scores_strategy()) {
        let shares = normalize(&scores).unwrap();
        let sum: f64 = shares.iter().map(|(_, s)| s).sum();
        prop_assert!((sum - 1.0).abs() < 1e-4);
        for (act, score) in &scores {
            prop_assert_eq!(shares.contains(act), *score > 0);
        }
        prop_assert!(shares.iter().all(|(_, s)| s > 0.0));
    }

    #[test]
    fn horizon_allocation_sums_to_one(scores in scores_strategy(), spent in spent_strategy()) {
        let shares = normalize(&scores).unwrap();
        let plan = plan_allocation(&spent, &shares);

        if let Some(horizon) = plan.min_required_time_s {
            prop_assert!(horizon > 0.0);
            let sum: f64 = plan.allocation.values().sum();
            prop_assert!((sum - 1.0).abs() < 1e-4, "sum was {}", sum);
            prop_assert!(plan.allocation.values().all(|&f| f > 0.0), "{:?}", plan.allocation);
        } else {
            prop_assert_eq!(&plan.allocation, shares.as_map());
        }

        prop_assert!(plan.allocation.keys().all(|a| shares.contains(a)));
    }

    #[test]
    fn allocation_is_idempotent(scores in scores_strategy(), spent in spent_strategy()) {
        let shares: BTreeMap<String, f64> = normalize(&scores).unwrap().into_map();
        let first = compute_allocation(&spent, &shares).unwrap();
        let second = compute_allocation(&spent, &shares).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn replay_lists_each_weighted_activity_once(scores in scores_strategy(), events in events_strategy()) {
        let result = replay(&scores, &events).unwrap();
        let mut names: Vec<&str> = result.iter().map(|d| d.activity()).collect();
        let expected = scores.values().filter(|&&s| s > 0).count();

        prop_assert_eq!(names.len(), expected);
        names.sort_unstable();
        names.dedup();
        prop_assert_eq!(names.len(), expected);
        prop_assert!(result.iter().all(|d| d.seconds() >= 0.0));

        prop_assert_eq!(replay(&scores, &events), Some(result));
    }
}
