//! Error types for group-control operations.

use thiserror::Error;
use wg_core::WgError;
use wg_schedule::ScheduleError;
use wg_state::StateError;

pub type ControlResult<T> = Result<T, ControlError>;

/// Errors raised by group-control operations.
///
/// Configuration errors are fatal for the run and name the offending group.
#[derive(Error, Debug)]
pub enum ControlError {
    #[error("Unsupported control mode {mode} for group {group}")]
    UnsupportedMode { group: String, mode: String },

    #[error("{what}. Group {group}")]
    Config { group: String, what: String },

    #[error("{name} is not below {top} in the group tree")]
    NotInChain { name: String, top: String },

    #[error("VFP table {table}: {what}")]
    Vfp { table: u32, what: String },

    #[error("Well state has {found} phases in a different layout from the run's {expected}")]
    PhaseLayout { expected: usize, found: usize },

    #[error("Network node {node} has no pressure source")]
    NetworkNode { node: String },

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Core error: {0}")]
    Core(#[from] WgError),
}

impl ControlError {
    pub(crate) fn config(group: &str, what: impl Into<String>) -> Self {
        ControlError::Config {
            group: group.to_string(),
            what: what.into(),
        }
    }

    pub(crate) fn unsupported(group: &str, mode: impl std::fmt::Debug) -> Self {
        ControlError::UnsupportedMode {
            group: group.to_string(),
            mode: format!("{mode:?}").to_uppercase(),
        }
    }
}
