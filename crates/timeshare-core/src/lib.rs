//! # Timeshare Core Library
//!
//! Decides what to spend time on next, given how much time has gone into a
//! set of activities and how that time should ideally be split.
//!
//! ## Architecture
//!
//! - **Allocation**: turns scores into target shares and computes the
//!   closed-form split of future time that restores the target proportions
//! - **Replay**: replays a chronological history of time spent into a
//!   rotating priority list of per-activity deficits
//! - **Ingestion**: history, event and target files converted to whole seconds
//!   and validated shares
//! - **Integrations**: time-tracking source, task board and keyring glue
//!
//! The allocation and replay modules are pure: no I/O, no logging, no shared
//! state. Everything else only feeds them or publishes their result.
//!
//! ## Key Components
//!
//! - [`compute_allocation`]: future allocation plan for a time-spent snapshot
//! - [`normalize`]: integer scores to target shares
//! - [`replay`]: rotated deficit list for a history of events
//! - [`Config`]: application configuration management

pub mod allocation;
pub mod error;
pub mod history;
pub mod integrations;
pub mod replay;
pub mod storage;
pub mod targets;

pub use allocation::{
    compute_allocation, normalize, plan_allocation, validate_shares, Activity, AllocationPlan,
    PriorityTask, Scores, TargetShares, TimeSpent,
};
pub use error::{AllocationError, ConfigError, CoreError, InputError, IntegrationError};
pub use replay::{replay, Deficit, PriorityCycle, ReplayEngine, SpendEvent};
pub use storage::Config;
pub use targets::{TargetInput, TargetKind};
