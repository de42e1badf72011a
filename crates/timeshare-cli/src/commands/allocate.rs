use std::path::PathBuf;

use clap::Args;
use timeshare_core::history::load_time_spent;
use timeshare_core::targets::{load_target, TargetKind};
use timeshare_core::{plan_allocation, AllocationPlan};

use super::{format_seconds, CmdResult};

#[derive(Args)]
pub struct AllocateArgs {
    /// JSON map of activity name to seconds already spent
    #[arg(long)]
    history: PathBuf,
    /// Target weights: JSON scores, a two-column CSV export, or shares with --shares
    #[arg(long)]
    target: PathBuf,
    /// Write the plan as JSON here instead of printing a summary
    #[arg(long)]
    output: Option<PathBuf>,
    /// Read the target as fractions that already sum to 1
    #[arg(long)]
    shares: bool,
}

pub fn run(args: AllocateArgs) -> CmdResult {
    let kind = if args.shares {
        TargetKind::Shares
    } else {
        TargetKind::Scores
    };

    let spent = load_time_spent(&args.history)?;
    let shares = load_target(&args.target, kind)?.into_shares()?;
    let plan = plan_allocation(&spent, &shares);

    match args.output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&plan)?;
            std::fs::write(&path, json)?;
            println!("plan written to {}", path.display());
        }
        None => print_summary(&plan),
    }
    Ok(())
}

fn print_summary(plan: &AllocationPlan) {
    match plan.min_required_time_s {
        Some(horizon) => println!("Next {} ({horizon:.0}s):", format_seconds(horizon)),
        None => println!("On target; keep to the shares:"),
    }
    for (activity, fraction) in plan.ranked() {
        let pct = fraction * 100.0;
        match plan.required_for(activity) {
            Some(secs) => println!("  {activity:<20} {pct:>6.2}%  {}", format_seconds(secs)),
            None => println!("  {activity:<20} {pct:>6.2}%"),
        }
    }
}
