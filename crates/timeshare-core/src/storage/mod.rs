mod config;

pub use config::{BoardConfig, Config, TargetsConfig, TrackingConfig};

use std::path::PathBuf;

/// Returns `~/.config/timeshare[-dev]/` based on TIMESHARE_ENV.
///
/// Set TIMESHARE_ENV=dev to use the development data directory, or
/// TIMESHARE_HOME to point at an explicit directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("TIMESHARE_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("TIMESHARE_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("timeshare-dev")
            } else {
                base_dir.join("timeshare")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
