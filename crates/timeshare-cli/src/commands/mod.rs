pub mod allocate;
pub mod auth;
pub mod config;
pub mod replay;
pub mod sync;

/// Result type shared by every subcommand.
pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// `2h 5m`, `12m` or `40s`.
pub fn format_seconds(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}h {m}m")
    } else if m > 0 {
        format!("{m}m")
    } else {
        format!("{s}s")
    }
}
