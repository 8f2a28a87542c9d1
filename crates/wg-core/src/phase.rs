//! Active phases and their positions in rate vectors.
//!
//! Rate vectors carry one entry per active phase. Positions are assigned in
//! the fixed order water, oil, gas, skipping inactive phases, so the mapping
//! is injective and identical everywhere in a run.

use core::fmt;

use crate::{WgError, WgResult};

/// A fluid phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Phase {
    Water,
    Oil,
    Gas,
}

impl Phase {
    /// All phases in canonical order.
    pub const ALL: [Phase; 3] = [Phase::Water, Phase::Oil, Phase::Gas];

    fn slot(self) -> usize {
        match self {
            Phase::Water => 0,
            Phase::Oil => 1,
            Phase::Gas => 2,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Water => "WATER",
            Phase::Oil => "OIL",
            Phase::Gas => "GAS",
        };
        f.write_str(s)
    }
}

/// Which phases are active and where each sits in a rate vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseUsage {
    pos: [Option<usize>; 3],
    num_phases: usize,
}

impl PhaseUsage {
    /// Build a phase usage from active flags. Two or three phases must be active.
    pub fn new(water: bool, oil: bool, gas: bool) -> WgResult<Self> {
        let mut pos = [None; 3];
        let mut next = 0;
        for (slot, used) in [water, oil, gas].into_iter().enumerate() {
            if used {
                pos[slot] = Some(next);
                next += 1;
            }
        }
        if !(2..=3).contains(&next) {
            return Err(WgError::InvalidArg {
                what: "two or three phases must be active",
            });
        }
        Ok(Self {
            pos,
            num_phases: next,
        })
    }

    /// Water, oil and gas all active.
    pub fn three_phase() -> Self {
        Self {
            pos: [Some(0), Some(1), Some(2)],
            num_phases: 3,
        }
    }

    pub fn num_phases(&self) -> usize {
        self.num_phases
    }

    pub fn is_used(&self, phase: Phase) -> bool {
        self.pos[phase.slot()].is_some()
    }

    /// Position of `phase` in rate vectors, if active.
    pub fn pos(&self, phase: Phase) -> Option<usize> {
        self.pos[phase.slot()]
    }

    /// Position of `phase`, or an error if the phase is inactive.
    pub fn require(&self, phase: Phase) -> WgResult<usize> {
        self.pos(phase).ok_or(WgError::InactivePhase { phase })
    }

    /// Active phases with their positions, in canonical order.
    pub fn active(&self) -> impl Iterator<Item = (Phase, usize)> + '_ {
        Phase::ALL
            .into_iter()
            .filter_map(|phase| self.pos(phase).map(|p| (phase, p)))
    }

    /// Component of `rates` for `phase`, zero if the phase is inactive.
    pub fn component(&self, rates: &[f64], phase: Phase) -> f64 {
        self.pos(phase)
            .and_then(|p| rates.get(p).copied())
            .unwrap_or(0.0)
    }

    /// Check that a rate vector has one entry per active phase.
    pub fn check_len(&self, what: &str, rates: &[f64]) -> WgResult<()> {
        if rates.len() == self.num_phases {
            Ok(())
        } else {
            Err(WgError::PhaseCount {
                what: what.to_string(),
                len: rates.len(),
                phases: self.num_phases,
            })
        }
    }
}

impl Default for PhaseUsage {
    fn default() -> Self {
        Self::three_phase()
    }
}
