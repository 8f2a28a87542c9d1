//! Read-only inputs shared by the group-control operations.

use wg_core::{Phase, PhaseUsage};
use wg_schedule::{ScheduleStep, SummaryState, WellRole};
use wg_state::WellState;

use crate::error::{ControlError, ControlResult};

/// Schedule data and summary values for the current report step.
#[derive(Debug, Clone, Copy)]
pub struct ControlContext<'a> {
    pub step: &'a ScheduleStep,
    pub summary: &'a SummaryState,
    pub phase_usage: &'a PhaseUsage,
}

impl<'a> ControlContext<'a> {
    pub fn new(step: &'a ScheduleStep, summary: &'a SummaryState, phase_usage: &'a PhaseUsage) -> Self {
        Self {
            step,
            summary,
            phase_usage,
        }
    }

    /// Fails when `state` was built for a different phase layout.
    pub fn check_layout(&self, state: &WellState) -> ControlResult<()> {
        if state.phase_usage() == self.phase_usage {
            Ok(())
        } else {
            Err(ControlError::PhaseLayout {
                expected: self.phase_usage.num_phases(),
                found: state.num_phases(),
            })
        }
    }
}

/// Which group control a walk of the tree is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlSide {
    Production,
    Injection(Phase),
}

impl ControlSide {
    pub fn role(self) -> WellRole {
        match self {
            ControlSide::Production => WellRole::Producer,
            ControlSide::Injection(_) => WellRole::Injector,
        }
    }

    /// Whether the group's current control is NONE or FLD on this side.
    pub fn defers_to_parent(self, state: &WellState, group: &str) -> bool {
        match self {
            ControlSide::Production => state.production_control(group).is_transparent(),
            ControlSide::Injection(phase) => state.injection_control(phase, group).is_transparent(),
        }
    }

    /// Whether the well is currently under group control on this side.
    pub fn is_group_controlled(self, state: &WellState, well: &str) -> bool {
        match self {
            ControlSide::Production => state.is_production_grup(well),
            ControlSide::Injection(_) => state.is_injection_grup(well),
        }
    }
}
