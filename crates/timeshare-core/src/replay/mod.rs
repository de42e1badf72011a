//! Priority replay over a chronological history of time spent.
//!
//! - [`PriorityCycle`]: weight-ordered activities with wrap-around indexing
//! - [`ReplayEngine`]: incremental replay state
//! - [`replay`]: one-shot replay producing the rotated deficit list

mod cycle;
mod engine;

pub use cycle::PriorityCycle;
pub use engine::{replay, Deficit, ReplayEngine, SpendEvent};
