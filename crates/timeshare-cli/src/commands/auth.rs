use clap::Subcommand;
use timeshare_core::integrations::{keyring_store, TODOIST_TOKEN_KEY, TOGGL_TOKEN_KEY};

use super::CmdResult;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Toggl Track: login / logout / status
    Toggl {
        #[command(subcommand)]
        action: AuthOp,
    },
    /// Todoist: login / logout / status
    Todoist {
        #[command(subcommand)]
        action: AuthOp,
    },
}

#[derive(Subcommand)]
pub enum AuthOp {
    /// Store the API token in the OS keyring
    Login {
        /// API token
        #[arg(long)]
        token: String,
    },
    /// Remove credentials
    Logout,
    /// Check authentication status
    Status,
}

pub fn run(action: AuthAction) -> CmdResult {
    match action {
        AuthAction::Toggl { action: op } => handle(op, "Toggl", TOGGL_TOKEN_KEY),
        AuthAction::Todoist { action: op } => handle(op, "Todoist", TODOIST_TOKEN_KEY),
    }
}

fn handle(op: AuthOp, label: &str, key: &str) -> CmdResult {
    match op {
        AuthOp::Login { token } => {
            let token = token.trim();
            if token.is_empty() {
                return Err(format!("--token required for {label}").into());
            }
            keyring_store::set(key, token)?;
            println!("{label} token stored");
        }
        AuthOp::Logout => {
            keyring_store::delete(key)?;
            println!("{label} disconnected");
        }
        AuthOp::Status => {
            let stored = keyring_store::get(key)?.is_some_and(|t| !t.is_empty());
            println!(
                "{}",
                if stored {
                    "authenticated"
                } else {
                    "not authenticated"
                }
            );
        }
    }
    Ok(())
}
