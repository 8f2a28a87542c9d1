use thiserror::Error;
use wg_core::WgError;

pub type StateResult<T> = Result<T, StateError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    #[error("Unknown well in state: {name}")]
    UnknownWell { name: String },

    #[error("Well {name} already present in state")]
    DuplicateWell { name: String },

    #[error(transparent)]
    Core(#[from] WgError),
}
