//! Group target reductions.
//!
//! The reduction of a group is the part of its target already taken by
//! descendants that do not receive a guide-rate share from it:
//! individually controlled subgroups and wells, and subgroups without any
//! group-controlled wells. Reductions of subgroups without a registered
//! guide rate are passed on upward.

use tracing::trace;
use wg_core::Phase;
use wg_schedule::{Group, WellRole};
use wg_state::{GuideRate, InjectorControl, ProducerControl, WellState};

use crate::aggregate::{group_controlled_wells, sum_well_rates};
use crate::context::{ControlContext, ControlSide};
use crate::error::ControlResult;

/// Recompute reductions for `group` and its subtree, bottom-up.
///
/// Rates come from `nupcol`; current controls come from `state`, which
/// receives the results. Returns the reduction stored for `group`.
pub fn update_group_target_reduction(
    ctx: &ControlContext<'_>,
    group: &Group,
    role: WellRole,
    guide_rate: &GuideRate,
    nupcol: &WellState,
    state: &mut WellState,
) -> ControlResult<Vec<f64>> {
    ctx.check_layout(nupcol)?;
    ctx.check_layout(state)?;
    let step = ctx.step;
    let pu = ctx.phase_usage;
    let np = pu.num_phases();
    let mut reduction = vec![0.0; np];

    for child_name in group.groups() {
        let child = step.group(child_name)?;
        let child_reduction =
            update_group_target_reduction(ctx, child, role, guide_rate, nupcol, state)?;

        match role {
            WellRole::Injector => {
                for phase in Phase::ALL {
                    let Some(pos) = pu.pos(phase) else { continue };
                    let Some(slot) = reduction.get_mut(pos) else { continue };
                    if state.injection_control(phase, child_name).is_transparent() {
                        *slot += child_reduction.get(pos).copied().unwrap_or(0.0);
                    } else {
                        *slot += sum_well_rates(step, nupcol, child, pos, role)?;
                    }
                }
            }
            WellRole::Producer => {
                let individual = !state.production_control(child_name).is_transparent();
                let controlled = group_controlled_wells(
                    step,
                    nupcol,
                    child_name,
                    None,
                    ControlSide::Production,
                )?;
                if individual || controlled == 0 {
                    for (pos, r) in reduction.iter_mut().enumerate() {
                        *r += sum_well_rates(step, nupcol, child, pos, role)?;
                    }
                } else if !guide_rate.has(child_name) {
                    for (r, c) in reduction.iter_mut().zip(&child_reduction) {
                        *r += c;
                    }
                }
            }
        }
    }

    for well_name in group.wells() {
        let well = step.well(well_name)?;
        if well.role != role || well.is_shut() {
            continue;
        }
        let Some(record) = state.well(well_name) else {
            trace!(well = %well_name, "well not in state, skipped");
            continue;
        };
        if !record.is_owned() {
            continue;
        }
        let individual = match role {
            WellRole::Injector => record.injector_control() != InjectorControl::Grup,
            WellRole::Producer => record.producer_control() != ProducerControl::Grup,
        };
        if !individual {
            continue;
        }
        let rates = nupcol.surface_rates(well_name).unwrap_or(&[]);
        for (pos, r) in reduction.iter_mut().enumerate() {
            let rate = rates.get(pos).copied().unwrap_or(0.0) * well.efficiency_factor;
            match role {
                WellRole::Injector => *r += rate,
                WellRole::Producer => *r -= rate,
            }
        }
    }

    let efficiency = group.efficiency_factor();
    for r in &mut reduction {
        *r *= efficiency;
    }

    match role {
        WellRole::Injector => state.set_injection_reduction(group.name(), reduction.clone())?,
        WellRole::Producer => state.set_production_reduction(group.name(), reduction.clone())?,
    }
    Ok(reduction)
}
