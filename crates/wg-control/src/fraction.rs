//! Guide-rate allocation fractions.
//!
//! A child's local fraction is its guide rate over the summed guide rates
//! of the siblings that take part in allocation: those whose control
//! defers to the parent, plus an always-included child (the well being
//! checked, even if it is currently under individual control).

use wg_core::guarded_ratio;
use wg_schedule::{FIELD, Group, ScheduleStep};
use wg_state::{GuideRate, GuideRateTarget, RateVector, WellState};

use crate::aggregate;
use crate::context::ControlSide;
use crate::error::{ControlError, ControlResult};

pub fn well_rate_vector(state: &WellState, well: &str) -> RateVector {
    RateVector::from_rates(state.phase_usage(), state.current_well_rates(well))
}

pub fn production_group_rate_vector(state: &WellState, group: &str) -> RateVector {
    RateVector::from_rates(state.phase_usage(), state.production_group_rates(group))
}

fn parent_or_err<'s>(step: &'s ScheduleStep, name: &str, top: &str) -> ControlResult<&'s str> {
    step.parent_of(name)?.ok_or_else(|| ControlError::NotInChain {
        name: name.to_string(),
        top: top.to_string(),
    })
}

/// Names from `top` down to `bottom`, both included.
pub fn group_chain_top_bot(step: &ScheduleStep, bottom: &str, top: &str) -> ControlResult<Vec<String>> {
    let mut chain = vec![bottom.to_string()];
    let mut current = bottom;
    while current != top {
        current = parent_or_err(step, current, top)?;
        chain.push(current.to_string());
    }
    chain.reverse();
    Ok(chain)
}

/// Accumulated production guide rate of a well or group.
pub fn get_guide_rate(
    step: &ScheduleStep,
    state: &WellState,
    guide_rate: &GuideRate,
    name: &str,
    target: GuideRateTarget,
) -> ControlResult<f64> {
    if step.has_well(name) {
        return Ok(guide_rate.get(name, target, &well_rate_vector(state, name)));
    }
    if guide_rate.has(name) {
        return Ok(guide_rate.get(name, target, &production_group_rate_vector(state, name)));
    }

    let group = step.group(name)?;
    let mut total = 0.0;
    for child in group.groups() {
        if state.production_control(child).is_transparent() {
            total += get_guide_rate(step, state, guide_rate, child, target)?;
        }
    }
    for well_name in group.wells() {
        let well = step.well(well_name)?;
        if well.is_injector() || well.is_shut() || !state.is_production_grup(well_name) {
            continue;
        }
        total += guide_rate.get(well_name, target, &well_rate_vector(state, well_name));
    }
    Ok(total)
}

/// Accumulated injection guide rate of a well or group for one phase.
pub fn get_guide_rate_inj(
    step: &ScheduleStep,
    state: &WellState,
    guide_rate: &GuideRate,
    name: &str,
    target: GuideRateTarget,
    injection_phase: wg_core::Phase,
) -> ControlResult<f64> {
    if step.has_well(name) {
        return Ok(guide_rate.get(name, target, &well_rate_vector(state, name)));
    }
    if guide_rate.has_injection(name, injection_phase) {
        return Ok(guide_rate.get_injection(name, injection_phase));
    }

    let group = step.group(name)?;
    let mut total = 0.0;
    for child in group.groups() {
        if state.injection_control(injection_phase, child).is_transparent() {
            total += get_guide_rate_inj(step, state, guide_rate, child, target, injection_phase)?;
        }
    }
    for well_name in group.wells() {
        let well = step.well(well_name)?;
        if !well.is_injector() || well.is_shut() || !state.is_injection_grup(well_name) {
            continue;
        }
        total += guide_rate.get(well_name, target, &well_rate_vector(state, well_name));
    }
    Ok(total)
}

/// Computes guide-rate fractions for one control side and target.
#[derive(Debug, Clone, Copy)]
pub struct FractionCalculator<'a> {
    step: &'a ScheduleStep,
    state: &'a WellState,
    guide_rate: &'a GuideRate,
    target: GuideRateTarget,
    side: ControlSide,
}

impl<'a> FractionCalculator<'a> {
    pub fn new(
        step: &'a ScheduleStep,
        state: &'a WellState,
        guide_rate: &'a GuideRate,
        target: GuideRateTarget,
        side: ControlSide,
    ) -> Self {
        Self {
            step,
            state,
            guide_rate,
            target,
            side,
        }
    }

    /// Share of `control_group`'s target that reaches `name`: the product
    /// of local fractions from `name` up to, excluding, `control_group`.
    pub fn fraction(&self, name: &str, control_group: &str, always_include_this: bool) -> ControlResult<f64> {
        let always_included = always_include_this.then_some(name);
        let mut fraction = 1.0;
        let mut current = name;
        while current != control_group {
            fraction *= self.local_fraction(current, always_included)?;
            current = parent_or_err(self.step, current, control_group)?;
        }
        Ok(fraction)
    }

    /// Share of the parent's target that goes to `name`.
    pub fn local_fraction(&self, name: &str, always_included_child: Option<&str>) -> ControlResult<f64> {
        let own = self.guide_rate_of(name, always_included_child)?;
        let parent = parent_or_err(self.step, name, FIELD)?;
        let total = self.guide_rate_sum(self.step.group(parent)?, always_included_child)?;
        Ok(guarded_ratio(own, total))
    }

    /// Summed guide rate of the children of `group` taking part in allocation.
    pub fn guide_rate_sum(&self, group: &Group, always_included_child: Option<&str>) -> ControlResult<f64> {
        let mut total = 0.0;
        for child in group.groups() {
            if always_included_child == Some(child.as_str())
                || self.side.defers_to_parent(self.state, child)
            {
                total += self.guide_rate_of(child, always_included_child)?;
            }
        }
        for well in group.wells() {
            if always_included_child == Some(well.as_str())
                || self.side.is_group_controlled(self.state, well)
            {
                total += self.guide_rate_of(well, always_included_child)?;
            }
        }
        Ok(total)
    }

    /// Guide rate of a well, or of a group with group-controlled wells below it.
    pub fn guide_rate_of(&self, name: &str, always_included_child: Option<&str>) -> ControlResult<f64> {
        if self.step.has_well(name) {
            return Ok(self
                .guide_rate
                .get(name, self.target, &well_rate_vector(self.state, name)));
        }
        if self.group_controlled_wells(name, always_included_child)? == 0 {
            return Ok(0.0);
        }
        match self.side {
            ControlSide::Production if self.guide_rate.has(name) => Ok(self.guide_rate.get(
                name,
                self.target,
                &production_group_rate_vector(self.state, name),
            )),
            ControlSide::Injection(phase) if self.guide_rate.has_injection(name, phase) => {
                Ok(self.guide_rate.get_injection(name, phase))
            }
            _ => self.guide_rate_sum(self.step.group(name)?, always_included_child),
        }
    }

    pub fn group_controlled_wells(&self, group: &str, always_included_child: Option<&str>) -> ControlResult<usize> {
        aggregate::group_controlled_wells(self.step, self.state, group, always_included_child, self.side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wg_core::PhaseUsage;
    use wg_schedule::{ProductionCMode, ScheduleStepBuilder, Well, WellRole};
    use wg_state::{ProducerControl, WellRecord};

    fn grup(oil: f64) -> WellRecord {
        WellRecord::new(vec![0.0, -oil, 0.0]).with_producer_control(ProducerControl::Grup)
    }

    fn setup() -> (ScheduleStep, WellState, GuideRate) {
        let mut b = ScheduleStepBuilder::new();
        b.add_group("G1", FIELD)
            .add_group("G2", FIELD)
            .add_well(Well::new("W1", "G1", WellRole::Producer))
            .add_well(Well::new("W2", "G1", WellRole::Producer))
            .add_well(Well::new("W3", "G2", WellRole::Producer));
        let step = b.build().unwrap();

        let mut ws = WellState::new(PhaseUsage::three_phase());
        ws.insert_well("W1", grup(10.0)).unwrap();
        ws.insert_well("W2", grup(10.0)).unwrap();
        ws.insert_well("W3", grup(10.0)).unwrap();

        let mut gr = GuideRate::new();
        gr.set_production("W1", 3.0, GuideRateTarget::Oil);
        gr.set_production("W2", 1.0, GuideRateTarget::Oil);
        gr.set_production("W3", 4.0, GuideRateTarget::Oil);
        (step, ws, gr)
    }

    #[test]
    fn chain_runs_top_to_bottom() {
        let (step, _, _) = setup();
        assert_eq!(group_chain_top_bot(&step, "W1", FIELD).unwrap(), vec!["FIELD", "G1", "W1"]);
        assert_eq!(group_chain_top_bot(&step, "W1", "G1").unwrap(), vec!["G1", "W1"]);
        assert!(matches!(
            group_chain_top_bot(&step, "W1", "G2"),
            Err(ControlError::NotInChain { .. })
        ));
    }

    #[test]
    fn fractions_multiply_along_the_chain() {
        let (step, ws, gr) = setup();
        let calc = FractionCalculator::new(&step, &ws, &gr, GuideRateTarget::Oil, ControlSide::Production);
        assert!((calc.fraction("W1", "G1", false).unwrap() - 0.75).abs() < 1e-12);
        // G1 sums to 4 and G2 to 4 at FIELD level.
        assert!((calc.fraction("W1", FIELD, false).unwrap() - 0.375).abs() < 1e-12);
        assert_eq!(calc.fraction("G1", "G1", false).unwrap(), 1.0);
    }

    #[test]
    fn individually_controlled_sibling_is_excluded() {
        let (step, mut ws, gr) = setup();
        ws.set_production_control("G2", ProductionCMode::Orat);
        let calc = FractionCalculator::new(&step, &ws, &gr, GuideRateTarget::Oil, ControlSide::Production);
        assert!((calc.local_fraction("G1", None).unwrap() - 1.0).abs() < 1e-12);
        assert!((calc.local_fraction("G2", Some("G2")).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_guide_rate_sum_gives_zero_fraction() {
        let (step, ws, _) = setup();
        let gr = GuideRate::new();
        let calc = FractionCalculator::new(&step, &ws, &gr, GuideRateTarget::Oil, ControlSide::Production);
        assert_eq!(calc.local_fraction("W1", None).unwrap(), 0.0);
    }

    #[test]
    fn accumulated_guide_rates() {
        let (step, ws, mut gr) = setup();
        assert_eq!(get_guide_rate(&step, &ws, &gr, FIELD, GuideRateTarget::Oil).unwrap(), 8.0);
        gr.set_production("G1", 10.0, GuideRateTarget::Oil);
        assert_eq!(get_guide_rate(&step, &ws, &gr, FIELD, GuideRateTarget::Oil).unwrap(), 14.0);
        assert_eq!(
            get_guide_rate_inj(&step, &ws, &gr, FIELD, GuideRateTarget::Water, wg_core::Phase::Water)
                .unwrap(),
            0.0
        );
    }
}
