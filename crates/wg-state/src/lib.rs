//! wg-state: mutable per-iteration state of wells and groups.
//!
//! Contains:
//! - well_state (per-well rates, ownership, individual controls, ALQ)
//! - group_state (per-group controls, reductions, REIN/VREP, group rates)
//! - guide_rate (guide-rate registry for wells and groups)
//! - error (state errors)
//!
//! The caller keeps two copies of [`WellState`]: a snapshot frozen at the
//! start of the update column, which is only read, and the current state,
//! which the control updates write into.

pub mod error;
pub mod group_state;
pub mod guide_rate;
pub mod well_state;

pub use error::{StateError, StateResult};
pub use guide_rate::{GuideRate, GuideRateTarget, GuideRateValue, RateVector};
pub use well_state::{InjectorControl, ProducerControl, WellRecord, WellState};
