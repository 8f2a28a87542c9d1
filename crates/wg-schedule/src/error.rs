//! Error types for schedule construction and lookup.

use thiserror::Error;
use wg_core::{Phase, WgError};
use wg_network::NetworkError;

/// Errors raised while building, loading or querying a schedule.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Unknown group: {name}")]
    UnknownGroup { name: String },

    #[error("Unknown well: {name}")]
    UnknownWell { name: String },

    #[error("Report step {step} out of range (steps={len})")]
    UnknownReportStep { step: usize, len: usize },

    #[error("Summary symbol {symbol} has no value")]
    UnknownSymbol { symbol: String },

    #[error("Duplicate name: {name}")]
    DuplicateName { name: String },

    #[error("Group {group} refers to missing parent {parent}")]
    MissingParent { group: String, parent: String },

    #[error("FIELD cannot have a parent group")]
    FieldHasParent,

    #[error("Group tree contains a cycle through {group}")]
    Cycle { group: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Group {group} is not a production group")]
    NotProductionGroup { group: String },

    #[error("Group {group} has no injection control for phase {phase}")]
    NoInjectionControl { group: String, phase: Phase },

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Core error: {0}")]
    Core(#[from] WgError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
