use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "timeshare-cli", version, about = "Timeshare CLI")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split upcoming time so cumulative spend reaches the target shares
    Allocate(commands::allocate::AllocateArgs),
    /// Replay a history of spend events into a rotating priority list
    Replay(commands::replay::ReplayArgs),
    /// Pull tracked time, compute the priority and publish it as a task
    Sync(commands::sync::SyncArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Authentication management for integrations
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("TIMESHARE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Allocate(args) => commands::allocate::run(args),
        Commands::Replay(args) => commands::replay::run(args),
        Commands::Sync(args) => commands::sync::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Auth { action } => commands::auth::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
