//! Efficiency-weighted rate sums over the group tree.
//!
//! Wells missing from the state, owned by another process, of the other
//! role, or shut are skipped. Injector rates are added and producer rates
//! subtracted, so both sums come out positive under the simulator's sign
//! convention. Each subtree total is multiplied by its group's efficiency
//! factor.

use tracing::trace;
use wg_schedule::{FIELD, Group, ScheduleStep, WellRole};
use wg_state::{WellRecord, WellState};

use crate::context::ControlSide;
use crate::error::ControlResult;

/// Which per-well rates to sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateKind {
    Surface,
    Reservoir,
}

fn sum_over_wells<F>(
    step: &ScheduleStep,
    state: &WellState,
    group: &Group,
    role: WellRole,
    rate: &F,
) -> ControlResult<f64>
where
    F: Fn(&WellRecord) -> f64,
{
    let mut total = 0.0;
    for child in group.groups() {
        total += sum_over_wells(step, state, step.group(child)?, role, rate)?;
    }

    for name in group.wells() {
        let Some(record) = state.well(name) else {
            trace!(well = %name, group = group.name(), "well not in state, skipped");
            continue;
        };
        if !record.is_owned() {
            continue;
        }
        let well = step.well(name)?;
        if well.role != role || well.is_shut() {
            continue;
        }
        let contribution = well.efficiency_factor * rate(record);
        match role {
            WellRole::Injector => total += contribution,
            WellRole::Producer => total -= contribution,
        }
    }

    Ok(group.efficiency_factor() * total)
}

/// Sum one phase position of the chosen rates over a group's subtree.
pub fn sum_well_phase_rates(
    step: &ScheduleStep,
    state: &WellState,
    group: &Group,
    kind: RateKind,
    phase_pos: usize,
    role: WellRole,
) -> ControlResult<f64> {
    let rate = |record: &WellRecord| {
        let rates = match kind {
            RateKind::Surface => record.surface_rates(),
            RateKind::Reservoir => record.reservoir_rates(),
        };
        rates.get(phase_pos).copied().unwrap_or(0.0)
    };
    sum_over_wells(step, state, group, role, &rate)
}

pub fn sum_well_rates(
    step: &ScheduleStep,
    state: &WellState,
    group: &Group,
    phase_pos: usize,
    role: WellRole,
) -> ControlResult<f64> {
    sum_well_phase_rates(step, state, group, RateKind::Surface, phase_pos, role)
}

pub fn sum_well_res_rates(
    step: &ScheduleStep,
    state: &WellState,
    group: &Group,
    phase_pos: usize,
    role: WellRole,
) -> ControlResult<f64> {
    sum_well_phase_rates(step, state, group, RateKind::Reservoir, phase_pos, role)
}

pub fn sum_solvent_rates(
    step: &ScheduleStep,
    state: &WellState,
    group: &Group,
    role: WellRole,
) -> ControlResult<f64> {
    sum_over_wells(step, state, group, role, &|record: &WellRecord| record.solvent_rate())
}

/// Product of efficiency factors from `group` up to, but excluding, FIELD.
///
/// The starting group's own factor always counts, so FIELD alone yields
/// its own factor.
pub fn accumulate_group_efficiency_factor(step: &ScheduleStep, group: &Group) -> ControlResult<f64> {
    let mut factor = group.efficiency_factor();
    let mut current = group;
    while let Some(parent) = current.parent().filter(|&p| p != FIELD) {
        current = step.group(parent)?;
        factor *= current.efficiency_factor();
    }
    Ok(factor)
}

/// Number of wells under group control below `group`.
///
/// Descends only into subgroups whose current control defers to their
/// parent. `always_included_child` is counted (and descended into)
/// regardless of its control.
pub fn group_controlled_wells(
    step: &ScheduleStep,
    state: &WellState,
    group: &str,
    always_included_child: Option<&str>,
    side: ControlSide,
) -> ControlResult<usize> {
    let group = step.group(group)?;
    let mut count = 0;
    for child in group.groups() {
        let included =
            always_included_child == Some(child.as_str()) || side.defers_to_parent(state, child);
        if included {
            count += group_controlled_wells(step, state, child, always_included_child, side)?;
        }
    }
    for well in group.wells() {
        if always_included_child == Some(well.as_str()) || side.is_group_controlled(state, well) {
            count += 1;
        }
    }
    Ok(count)
}
