//! Integration tests for the file-driven allocation and replay pipelines.

use std::io::Write;
use std::path::Path;

use timeshare_core::history::{load_events, load_time_spent};
use timeshare_core::targets::{load_target, TargetKind};
use timeshare_core::{plan_allocation, replay, PriorityTask};

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_scores_pipeline_from_sheet_export() {
    let dir = tempfile::tempdir().unwrap();
    let history = write_file(dir.path(), "history.json", r#"{ "Reading": 7200, "Gaming": 36000 }"#);
    let target = write_file(
        dir.path(),
        "weights.csv",
        "Activity,Points\nReading,1\nExercise,1\nGaming,0\n",
    );

    let spent = load_time_spent(&history).unwrap();
    let input = load_target(&target, TargetKind::Scores).unwrap();
    let names = input.activity_names();
    let shares = input.into_shares().unwrap();

    let plan = plan_allocation(&spent, &shares);
    assert_eq!(plan.min_required_time_s, Some(7200.0));
    assert_eq!(plan.allocation.get("Exercise"), Some(&1.0));
    assert!(!plan.allocation.contains_key("Gaming"));

    let task = PriorityTask::from_plan(&plan).unwrap();
    assert_eq!(task.title(), "Exercise (2h 0m)");
    assert!(names.contains(&"Gaming".to_string()));
}

#[test]
fn test_shares_pipeline_rejects_bad_sum() {
    let dir = tempfile::tempdir().unwrap();
    let target = write_file(dir.path(), "shares.json", r#"{ "A": 0.6, "B": 0.6 }"#);

    let input = load_target(&target, TargetKind::Shares).unwrap();
    assert!(input.into_shares().is_err());
}

#[test]
fn test_replay_pipeline_from_event_file() {
    let dir = tempfile::tempdir().unwrap();
    let goal = write_file(
        dir.path(),
        "goal.json",
        r#"{ "A": 1, "B": 1, "C": 1, "D": 1, "E": 1, "F": 1 }"#,
    );
    let events = write_file(
        dir.path(),
        "events.json",
        r#"[["B", 1], ["A", 20], ["Unknown", 99], ["B", 20], ["C", 10]]"#,
    );

    let goal = timeshare_core::targets::load_scores(&goal).unwrap();
    let events = load_events(&events).unwrap();
    let result = replay(&goal, &events).unwrap();

    let summary: Vec<(&str, f64)> = result.iter().map(|d| (d.activity(), d.seconds())).collect();
    assert_eq!(
        summary,
        vec![
            ("C", 11.0),
            ("D", 21.0),
            ("E", 21.0),
            ("F", 21.0),
            ("A", 1.0),
            ("B", 0.0),
        ]
    );
}
