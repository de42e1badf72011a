//! Sync subcommand: tracked time in, one priority task out.
//!
//! Reads elapsed time per project from Toggl, weights from the configured
//! target file, and replaces the generated task on the Todoist board.

use clap::Args;
use timeshare_core::integrations::{
    publish_priority, NameCache, TimeSource, TodoistClient, TogglClient,
};
use timeshare_core::targets::{load_target, TargetKind};
use timeshare_core::{plan_allocation, Config, PriorityTask};

use super::{format_seconds, CmdResult};

#[derive(Args)]
pub struct SyncArgs {
    /// Preview the task without touching the board
    #[arg(long)]
    dry_run: bool,
}

pub fn run(args: SyncArgs) -> CmdResult {
    let config = Config::load()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(sync(&config, args.dry_run))
}

async fn sync(config: &Config, dry_run: bool) -> CmdResult {
    let kind = if config.targets.shares {
        TargetKind::Shares
    } else {
        TargetKind::Scores
    };
    let target = load_target(config.targets_path()?, kind)?;
    let activity_names = target.activity_names();
    let shares = target.into_shares()?;

    let tracker = TogglClient::from_keyring(&config.tracking.workspace_name)?
        .with_running_entry(config.tracking.include_running);
    let mut cache = NameCache::new();
    let spent = tracker
        .time_spent_since(config.tracking.since, &mut cache)
        .await?;
    tracing::debug!(activities = spent.len(), "fetched tracked time");

    let plan = plan_allocation(&spent, &shares);
    let task = PriorityTask::from_plan(&plan).ok_or("allocation is empty")?;

    if dry_run {
        println!("Dry run; the board is unchanged.");
        match task.required_s {
            Some(secs) => println!("Next: {} for {}", task.activity, format_seconds(secs)),
            None => println!("Next: {}", task.activity),
        }
        println!("Task: {}", task.title());
        return Ok(());
    }

    let board = TodoistClient::from_keyring()?.with_project(config.board.project_id.clone());
    let outcome = publish_priority(&board, &task, &activity_names, &config.board.due_string).await?;

    println!("Removed {} stale task(s)", outcome.removed);
    println!("Created: {}", outcome.created.content);
    Ok(())
}
