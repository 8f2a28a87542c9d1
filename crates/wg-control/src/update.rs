//! Per-iteration refresh of group state.
//!
//! Each function walks the subtree below `group` children-first, reads
//! rates from the `nupcol` snapshot and writes into the current state.

use tracing::debug;
use wg_core::Phase;
use wg_schedule::{Group, GroupEvent, GuideRateInjTarget, InjectionCMode, ProductionCMode, WellRole};
use wg_state::{GuideRate, WellState};

use crate::aggregate::{sum_well_rates, sum_well_res_rates};
use crate::context::ControlContext;
use crate::error::{ControlError, ControlResult};

fn for_children<F>(ctx: &ControlContext<'_>, group: &Group, mut f: F) -> ControlResult<()>
where
    F: FnMut(&Group) -> ControlResult<()>,
{
    for child in group.groups() {
        f(ctx.step.group(child)?)?;
    }
    Ok(())
}

fn phase_sums(
    ctx: &ControlContext<'_>,
    group: &Group,
    nupcol: &WellState,
    role: WellRole,
    reservoir: bool,
) -> ControlResult<Vec<f64>> {
    (0..ctx.phase_usage.num_phases())
        .map(|pos| {
            if reservoir {
                sum_well_res_rates(ctx.step, nupcol, group, pos, role)
            } else {
                sum_well_rates(ctx.step, nupcol, group, pos, role)
            }
        })
        .collect()
}

/// Seed and refresh the current group control modes.
///
/// Groups without a current mode start at NONE. Declared modes replace the
/// current ones when the step raises an update event for the group, and a
/// group with a gas sales target is put under SALE control for gas.
pub fn set_cmode_group(ctx: &ControlContext<'_>, group: &Group, state: &mut WellState) -> ControlResult<()> {
    for_children(ctx, group, |child| set_cmode_group(ctx, child, state))?;

    let name = group.name();
    for phase in Phase::ALL {
        if !state.has_injection_control(phase, name) {
            state.set_injection_control(phase, name, InjectionCMode::None);
        }
    }
    if !state.has_production_control(name) {
        state.set_production_control(name, ProductionCMode::None);
    }

    if group.is_injection_group() && ctx.step.has_event(name, GroupEvent::InjectionUpdate) {
        for phase in Phase::ALL {
            if !group.has_injection_control(phase) {
                continue;
            }
            let controls = group.injection_controls(phase, ctx.summary)?;
            debug!(group = name, %phase, cmode = ?controls.cmode, "injection control from schedule");
            state.set_injection_control(phase, name, controls.cmode);
        }
    }

    if group.is_production_group() && ctx.step.has_event(name, GroupEvent::ProductionUpdate) {
        let controls = group.production_controls(ctx.summary)?;
        debug!(group = name, cmode = ?controls.cmode, "production control from schedule");
        state.set_production_control(name, controls.cmode);
    }

    if ctx.step.has_gas_sales(name) {
        state.set_injection_control(Phase::Gas, name, InjectionCMode::Sale);
    }
    Ok(())
}

/// Total producer reservoir voidage per group.
pub fn update_vrep_for_groups(
    ctx: &ControlContext<'_>,
    group: &Group,
    nupcol: &WellState,
    state: &mut WellState,
) -> ControlResult<()> {
    for_children(ctx, group, |child| update_vrep_for_groups(ctx, child, nupcol, state))?;
    let voidage = phase_sums(ctx, group, nupcol, WellRole::Producer, true)?
        .iter()
        .sum();
    state.set_vrep(group.name(), voidage);
    Ok(())
}

/// Injector reservoir rates per group and phase.
pub fn update_reservoir_rates_injection_groups(
    ctx: &ControlContext<'_>,
    group: &Group,
    nupcol: &WellState,
    state: &mut WellState,
) -> ControlResult<()> {
    for_children(ctx, group, |child| {
        update_reservoir_rates_injection_groups(ctx, child, nupcol, state)
    })?;
    let rates = phase_sums(ctx, group, nupcol, WellRole::Injector, true)?;
    state.set_injection_reservoir_rates(group.name(), rates)?;
    Ok(())
}

/// Current well rates with production made positive. Wells missing from
/// the state get zeros.
pub fn update_well_rates(
    ctx: &ControlContext<'_>,
    group: &Group,
    nupcol: &WellState,
    state: &mut WellState,
) -> ControlResult<()> {
    for_children(ctx, group, |child| update_well_rates(ctx, child, nupcol, state))?;
    let np = ctx.phase_usage.num_phases();
    for well_name in group.wells() {
        let mut rates = vec![0.0; np];
        if state.has_well(well_name) {
            let sign = if ctx.step.well(well_name)?.is_injector() {
                1.0
            } else {
                -1.0
            };
            if let Some(source) = nupcol.surface_rates(well_name) {
                for (r, s) in rates.iter_mut().zip(source) {
                    *r = sign * s;
                }
            }
        }
        state.set_current_well_rates(well_name, rates)?;
    }
    Ok(())
}

/// Producer surface rates per group and phase.
pub fn update_group_production_rates(
    ctx: &ControlContext<'_>,
    group: &Group,
    nupcol: &WellState,
    state: &mut WellState,
) -> ControlResult<()> {
    for_children(ctx, group, |child| {
        update_group_production_rates(ctx, child, nupcol, state)
    })?;
    let rates = phase_sums(ctx, group, nupcol, WellRole::Producer, false)?;
    state.set_production_group_rates(group.name(), rates)?;
    Ok(())
}

/// Rates available for re-injection: production, plus gas import minus
/// gas consumption where declared.
pub fn update_rein_for_groups(
    ctx: &ControlContext<'_>,
    group: &Group,
    nupcol: &WellState,
    state: &mut WellState,
) -> ControlResult<()> {
    for_children(ctx, group, |child| update_rein_for_groups(ctx, child, nupcol, state))?;
    let mut rein = phase_sums(ctx, group, nupcol, WellRole::Producer, false)?;
    if let Some(gas) = ctx.step.gas_consumption(group.name(), ctx.summary)? {
        if let Some(pos) = ctx.phase_usage.pos(Phase::Gas) {
            rein[pos] += gas.import_rate - gas.consumption_rate;
        }
    }
    state.set_rein(group.name(), rein)?;
    Ok(())
}

/// Register injection group guide rates derived from voidage.
pub fn update_guide_rates_for_injection_groups(
    ctx: &ControlContext<'_>,
    group: &Group,
    state: &WellState,
    guide_rate: &mut GuideRate,
) -> ControlResult<()> {
    for_children(ctx, group, |child| {
        update_guide_rates_for_injection_groups(ctx, child, state, guide_rate)
    })?;

    let name = group.name();
    for phase in Phase::ALL {
        if !group.has_injection_control(phase) {
            continue;
        }
        let controls = group.injection_controls(phase, ctx.summary)?;
        let value = match controls.guide_rate_def {
            GuideRateInjTarget::Void => state.vrep(name),
            GuideRateInjTarget::Netv => {
                let injected = state.injection_reservoir_rates(name);
                let mut value = state.vrep(name);
                for (other, pos) in ctx.phase_usage.active() {
                    if other != phase {
                        value -= injected.get(pos).copied().unwrap_or(0.0);
                    }
                }
                value
            }
            GuideRateInjTarget::Resv => {
                return Err(ControlError::config(name, "GUIDE PHASE RESV not implemented"));
            }
            GuideRateInjTarget::Rate | GuideRateInjTarget::Potn | GuideRateInjTarget::NoGuideRate => 0.0,
        };
        guide_rate.compute_injection(name, phase, value, controls.guide_rate_def, controls.guide_rate);
    }
    Ok(())
}
