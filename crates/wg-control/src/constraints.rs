//! Group constraint checks for a well or group.
//!
//! Starting at the group that owns the checked entity, the check climbs
//! through groups whose control defers to their parent until it reaches
//! the controlling group. That group's target is then carried back down
//! the chain: reductions are subtracted at the top and at levels with a
//! registered guide rate, the checked entity's own contribution is added
//! back once, and each level's guide-rate fraction is applied.

use serde::Serialize;
use tracing::debug;
use wg_core::{MIN_TARGET_RATE, Phase};
use wg_schedule::Group;
use wg_state::{GuideRate, WellState};

use crate::aggregate::group_controlled_wells;
use crate::context::{ControlContext, ControlSide};
use crate::error::ControlResult;
use crate::fraction::{FractionCalculator, group_chain_top_bot};
use crate::target::{InjectionTargetCalculator, TargetCalculator};

/// The target a checked entity was measured against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingTarget {
    /// The group whose control applies.
    pub group: String,
    pub target_rate: f64,
    pub current_rate: f64,
}

/// Outcome of a group constraint check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupConstraintCheck {
    pub violated: bool,
    /// Factor to apply to the entity's rate to meet its share of the target.
    pub scale: f64,
    /// `None` when no group control reaches the entity.
    pub binding: Option<BindingTarget>,
}

impl GroupConstraintCheck {
    pub fn unconstrained() -> Self {
        Self {
            violated: false,
            scale: 1.0,
            binding: None,
        }
    }

    /// Scale is `target / current`, or 1 when the entity does not flow yet.
    fn against(group: &str, current_rate: f64, target_rate: f64) -> Self {
        let scale = if current_rate > 0.0 {
            target_rate / current_rate
        } else {
            1.0
        };
        Self {
            violated: current_rate > target_rate,
            scale,
            binding: Some(BindingTarget {
                group: group.to_string(),
                target_rate,
                current_rate,
            }),
        }
    }

    pub fn target_rate(&self) -> Option<f64> {
        self.binding.as_ref().map(|b| b.target_rate)
    }
}

/// Read-only group constraint checks against the current state.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintChecker<'a> {
    ctx: ControlContext<'a>,
    state: &'a WellState,
    guide_rate: &'a GuideRate,
    resv_coeff: &'a [f64],
}

impl<'a> ConstraintChecker<'a> {
    pub fn new(
        ctx: ControlContext<'a>,
        state: &'a WellState,
        guide_rate: &'a GuideRate,
        resv_coeff: &'a [f64],
    ) -> Self {
        Self {
            ctx,
            state,
            guide_rate,
            resv_coeff,
        }
    }

    /// Climb to the group whose control applies, accumulating efficiency
    /// factors of the groups passed on the way.
    fn controlling_group(
        &self,
        group: &Group,
        side: ControlSide,
        efficiency_factor: f64,
    ) -> ControlResult<Option<(&'a Group, f64)>> {
        let mut current = self.ctx.step.group(group.name())?;
        let mut efficiency = efficiency_factor;
        loop {
            if !side.defers_to_parent(self.state, current.name()) {
                return Ok(Some((current, efficiency)));
            }
            let available = match side {
                ControlSide::Production => current.production_group_control_available(),
                ControlSide::Injection(phase) => current.injection_group_control_available(phase),
            };
            let Some(parent) = current.parent().filter(|_| available) else {
                return Ok(None);
            };
            efficiency *= current.efficiency_factor();
            current = self.ctx.step.group(parent)?;
        }
    }

    fn has_guide_rate(&self, side: ControlSide, name: &str) -> bool {
        match side {
            ControlSide::Production => self.guide_rate.has(name),
            ControlSide::Injection(phase) => self.guide_rate.has_injection(name, phase),
        }
    }

    /// Carry `top_target` down the chain from `top` to `name`.
    #[allow(clippy::too_many_arguments)]
    fn allocate<R>(
        &self,
        name: &str,
        top: &Group,
        side: ControlSide,
        fractions: &FractionCalculator<'_>,
        top_target: f64,
        own_contribution: f64,
        local_reduction: R,
    ) -> ControlResult<f64>
    where
        R: Fn(&str) -> ControlResult<f64>,
    {
        let chain = group_chain_top_bot(self.ctx.step, name, top.name())?;
        let num_ancestors = chain.len() - 1;
        let reduces_at = |level: usize| level == 0 || self.has_guide_rate(side, &chain[level]);
        let own_level = (0..num_ancestors).rev().find(|&l| reduces_at(l)).unwrap_or(0);

        let mut target = top_target;
        for level in 0..num_ancestors {
            if reduces_at(level) {
                target -= local_reduction(&chain[level])?;
                if level == own_level {
                    target += own_contribution;
                }
            }
            let below = &chain[level + 1];
            if level + 1 < num_ancestors {
                // Reductions of a level without group-controlled wells were
                // computed as if no guide-rate split applied there.
                let controlled = group_controlled_wells(self.ctx.step, self.state, below, None, side)?;
                if controlled == 0 && self.has_guide_rate(side, below) {
                    target += local_reduction(below)?;
                }
            }
            target *= fractions.local_fraction(below, Some(name))?;
        }
        Ok(target)
    }

    /// Check a producing well or group against its production group control.
    ///
    /// `group` is the group owning `name`; `rates` are the entity's surface
    /// rates (negative for production); `efficiency_factor` is the entity's
    /// own efficiency factor.
    pub fn check_production(
        &self,
        name: &str,
        group: &Group,
        rates: &[f64],
        efficiency_factor: f64,
    ) -> ControlResult<GroupConstraintCheck> {
        let side = ControlSide::Production;
        let Some((top, efficiency)) = self.controlling_group(group, side, efficiency_factor)? else {
            return Ok(GroupConstraintCheck::unconstrained());
        };
        if !top.is_production_group() {
            return Ok(GroupConstraintCheck::unconstrained());
        }

        let state = self.state;
        let cmode = state.production_control(top.name());
        let grat_from_sales = if state.has_grat_target_from_sales(top.name()) {
            state.grat_target_from_sales(top.name())
        } else {
            0.0
        };
        let tcalc = TargetCalculator::new(
            cmode,
            self.ctx.phase_usage,
            self.resv_coeff,
            grat_from_sales,
            top.name(),
        );
        let fractions = FractionCalculator::new(
            self.ctx.step,
            state,
            self.guide_rate,
            tcalc.guide_target_mode(),
            side,
        );

        let top_target = tcalc.group_target(&top.production_controls(self.ctx.summary)?)?;
        let current_rate = -tcalc.calc_mode_rate_from_rates(rates)?;
        let efficiency_incl_group = efficiency * top.efficiency_factor();
        let target = self.allocate(
            name,
            top,
            side,
            &fractions,
            top_target,
            current_rate * efficiency_incl_group,
            |g| tcalc.calc_mode_rate_from_rates(state.production_reduction(g)),
        )?;

        let target_rate = (target / efficiency_incl_group).max(MIN_TARGET_RATE);
        let check = GroupConstraintCheck::against(top.name(), current_rate, target_rate);
        if check.violated {
            debug!(name, group = top.name(), ?cmode, current_rate, target_rate, "production group constraint violated");
        }
        Ok(check)
    }

    /// Check an injecting well or group against its injection group control
    /// for `phase`.
    pub fn check_injection(
        &self,
        name: &str,
        group: &Group,
        rates: &[f64],
        phase: Phase,
        efficiency_factor: f64,
    ) -> ControlResult<GroupConstraintCheck> {
        let side = ControlSide::Injection(phase);
        let Some((top, efficiency)) = self.controlling_group(group, side, efficiency_factor)? else {
            return Ok(GroupConstraintCheck::unconstrained());
        };
        if !top.is_injection_group() {
            return Ok(GroupConstraintCheck::unconstrained());
        }

        let state = self.state;
        let cmode = state.injection_control(phase, top.name());
        let sales_target = self
            .ctx
            .step
            .gas_sales(top.name(), self.ctx.summary)?
            .map_or(0.0, |sales| sales.sales_target);
        let tcalc = InjectionTargetCalculator::new(
            cmode,
            self.ctx.phase_usage,
            self.resv_coeff,
            top.name(),
            sales_target,
            state,
            phase,
        )?;
        let fractions = FractionCalculator::new(
            self.ctx.step,
            state,
            self.guide_rate,
            tcalc.guide_target_mode(),
            side,
        );

        let top_target = tcalc.group_target(&top.injection_controls(phase, self.ctx.summary)?)?;
        let current_rate = tcalc.calc_mode_rate_from_rates(rates);
        let efficiency_incl_group = efficiency * top.efficiency_factor();
        let target = self.allocate(
            name,
            top,
            side,
            &fractions,
            top_target,
            current_rate * efficiency_incl_group,
            |g| Ok(tcalc.calc_mode_rate_from_rates(state.injection_reduction(g))),
        )?;

        let target_rate = (target / efficiency_incl_group).max(MIN_TARGET_RATE);
        let check = GroupConstraintCheck::against(top.name(), current_rate, target_rate);
        if check.violated {
            debug!(name, group = top.name(), %phase, ?cmode, current_rate, target_rate, "injection group constraint violated");
        }
        Ok(check)
    }
}
