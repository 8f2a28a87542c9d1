//! Error types for the command-line harness.

use std::path::PathBuf;

use wg_control::ControlError;
use wg_core::WgError;
use wg_schedule::ScheduleError;
use wg_state::StateError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read case file: {path}")]
    CaseFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Case file parse error: {0}")]
    CaseParse(#[from] serde_yaml::Error),

    #[error("Failed to write JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("VFP table {0} is defined more than once")]
    DuplicateVfpTable(u32),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Core(#[from] WgError),
}

pub type CliResult<T> = Result<T, CliError>;
