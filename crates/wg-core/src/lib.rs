//! wg-core: stable foundation for the well/group control workspace.
//!
//! Contains:
//! - numeric (Real, clamping sentinels, guarded ratios)
//! - phase (active phases and their positions in rate vectors)
//! - units (uom SI pressure + constructors)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod phase;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{WgError, WgResult};
pub use numeric::*;
pub use phase::{Phase, PhaseUsage};
pub use units::*;
