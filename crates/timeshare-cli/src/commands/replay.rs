use std::path::PathBuf;

use clap::Args;
use timeshare_core::history::load_events;
use timeshare_core::replay;
use timeshare_core::targets::load_scores;

use super::{format_seconds, CmdResult};

#[derive(Args)]
pub struct ReplayArgs {
    /// Goal scores: JSON map or two-column CSV export
    #[arg(long)]
    goal: PathBuf,
    /// JSON list of [activity, seconds] pairs, oldest first
    #[arg(long)]
    events: PathBuf,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ReplayArgs) -> CmdResult {
    let goal = load_scores(&args.goal)?;
    let events = load_events(&args.events)?;

    let Some(priorities) = replay(&goal, &events) else {
        if args.json {
            println!("null");
        } else {
            println!("No weighted activities in goal.");
        }
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&priorities)?);
        return Ok(());
    }

    for (i, deficit) in priorities.iter().enumerate() {
        let marker = if i == 0 { ">" } else { " " };
        println!(
            "{marker} {:<20} {}",
            deficit.activity(),
            format_seconds(deficit.seconds())
        );
    }
    Ok(())
}
