//! The per-iteration group-control update sequence.

use tracing::debug;
use wg_schedule::WellRole;
use wg_state::{GuideRate, WellState};

use crate::context::ControlContext;
use crate::error::ControlResult;
use crate::reduction::update_group_target_reduction;
use crate::update::{
    set_cmode_group, update_group_production_rates, update_guide_rates_for_injection_groups,
    update_rein_for_groups, update_reservoir_rates_injection_groups, update_vrep_for_groups,
    update_well_rates,
};

/// Run every group-state update from FIELD, in dependency order.
///
/// `nupcol` is the snapshot frozen at the start of the update column;
/// `state` receives the refreshed group controls, reductions and rates, and
/// `guide_rate` the injection group guide rates.
pub fn update_group_controls(
    ctx: &ControlContext<'_>,
    guide_rate: &mut GuideRate,
    nupcol: &WellState,
    state: &mut WellState,
) -> ControlResult<()> {
    let field = ctx.step.field()?;

    set_cmode_group(ctx, field, state)?;
    update_group_target_reduction(ctx, field, WellRole::Injector, guide_rate, nupcol, state)?;
    update_group_target_reduction(ctx, field, WellRole::Producer, guide_rate, nupcol, state)?;
    update_rein_for_groups(ctx, field, nupcol, state)?;
    update_vrep_for_groups(ctx, field, nupcol, state)?;
    update_reservoir_rates_injection_groups(ctx, field, nupcol, state)?;
    update_well_rates(ctx, field, nupcol, state)?;
    update_group_production_rates(ctx, field, nupcol, state)?;
    update_guide_rates_for_injection_groups(ctx, field, state, guide_rate)?;

    debug!(
        groups = ctx.step.groups().count(),
        wells = state.well_names().count(),
        "group controls updated"
    );
    Ok(())
}
