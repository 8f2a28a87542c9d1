use thiserror::Error;

pub type WgResult<T> = Result<T, WgError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WgError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Rate vector length mismatch for {what} (len={len}, phases={phases})")]
    PhaseCount {
        what: String,
        len: usize,
        phases: usize,
    },

    #[error("Phase {phase} is not active")]
    InactivePhase { phase: crate::Phase },
}
