//! Target calculators: map a group control mode to the rate it constrains
//! and to the group's numeric target for that rate.

use wg_core::{Phase, PhaseUsage};
use wg_schedule::{InjectionCMode, InjectionControls, ProductionCMode, ProductionControls};
use wg_state::{GuideRateTarget, WellState};

use crate::error::{ControlError, ControlResult};

/// Production target calculator for one controlling group.
#[derive(Debug, Clone, Copy)]
pub struct TargetCalculator<'a> {
    cmode: ProductionCMode,
    phase_usage: &'a PhaseUsage,
    resv_coeff: &'a [f64],
    grat_target_from_sales: f64,
    group: &'a str,
}

impl<'a> TargetCalculator<'a> {
    pub fn new(
        cmode: ProductionCMode,
        phase_usage: &'a PhaseUsage,
        resv_coeff: &'a [f64],
        grat_target_from_sales: f64,
        group: &'a str,
    ) -> Self {
        Self {
            cmode,
            phase_usage,
            resv_coeff,
            grat_target_from_sales,
            group,
        }
    }

    /// The controlled quantity evaluated on a phase-ordered rate vector.
    pub fn calc_mode_rate_from_rates(&self, rates: &[f64]) -> ControlResult<f64> {
        let pu = self.phase_usage;
        let at = |phase: Phase| -> ControlResult<f64> {
            let pos = pu.require(phase)?;
            Ok(rates.get(pos).copied().unwrap_or(0.0))
        };
        match self.cmode {
            ProductionCMode::Orat => at(Phase::Oil),
            ProductionCMode::Wrat => at(Phase::Water),
            ProductionCMode::Grat => at(Phase::Gas),
            ProductionCMode::Lrat => Ok(at(Phase::Oil)? + at(Phase::Water)?),
            ProductionCMode::Resv => Ok(rates
                .iter()
                .zip(self.resv_coeff)
                .map(|(rate, coeff)| rate * coeff)
                .sum()),
            other => Err(ControlError::unsupported(self.group, other)),
        }
    }

    /// The group's declared target for the mode. A positive gas target
    /// derived from sales replaces the declared GRAT target.
    pub fn group_target(&self, controls: &ProductionControls) -> ControlResult<f64> {
        match self.cmode {
            ProductionCMode::Orat => Ok(controls.oil_target),
            ProductionCMode::Wrat => Ok(controls.water_target),
            ProductionCMode::Grat if self.grat_target_from_sales > 0.0 => {
                Ok(self.grat_target_from_sales)
            }
            ProductionCMode::Grat => Ok(controls.gas_target),
            ProductionCMode::Lrat => Ok(controls.liquid_target),
            ProductionCMode::Resv => Ok(controls.resv_target),
            other => Err(ControlError::unsupported(self.group, other)),
        }
    }

    pub fn guide_target_mode(&self) -> GuideRateTarget {
        match self.cmode {
            ProductionCMode::Orat => GuideRateTarget::Oil,
            ProductionCMode::Wrat => GuideRateTarget::Water,
            ProductionCMode::Grat => GuideRateTarget::Gas,
            ProductionCMode::Lrat => GuideRateTarget::Liquid,
            ProductionCMode::Resv => GuideRateTarget::Resv,
            _ => GuideRateTarget::None,
        }
    }
}

/// Injection target calculator for one controlling group and phase.
#[derive(Debug, Clone, Copy)]
pub struct InjectionTargetCalculator<'a> {
    cmode: InjectionCMode,
    phase_usage: &'a PhaseUsage,
    resv_coeff: &'a [f64],
    group: &'a str,
    sales_target: f64,
    state: &'a WellState,
    pos: usize,
    target: GuideRateTarget,
}

impl<'a> InjectionTargetCalculator<'a> {
    /// Fails when the injection phase is not active.
    pub fn new(
        cmode: InjectionCMode,
        phase_usage: &'a PhaseUsage,
        resv_coeff: &'a [f64],
        group: &'a str,
        sales_target: f64,
        state: &'a WellState,
        injection_phase: Phase,
    ) -> ControlResult<Self> {
        let pos = phase_usage.require(injection_phase)?;
        let target = match injection_phase {
            Phase::Water => GuideRateTarget::Water,
            Phase::Oil => GuideRateTarget::Oil,
            Phase::Gas => GuideRateTarget::Gas,
        };
        Ok(Self {
            cmode,
            phase_usage,
            resv_coeff,
            group,
            sales_target,
            state,
            pos,
            target,
        })
    }

    pub fn calc_mode_rate_from_rates(&self, rates: &[f64]) -> f64 {
        rates.get(self.pos).copied().unwrap_or(0.0)
    }

    fn coeff(&self, pos: usize) -> ControlResult<f64> {
        match self.resv_coeff.get(pos) {
            Some(&c) if c > 0.0 => Ok(c),
            _ => Err(ControlError::config(
                self.group,
                "Reservoir volume coefficient must be positive",
            )),
        }
    }

    pub fn group_target(&self, controls: &InjectionControls) -> ControlResult<f64> {
        match self.cmode {
            InjectionCMode::Rate => Ok(controls.surface_max_rate),
            InjectionCMode::Resv => Ok(controls.resv_max_rate / self.coeff(self.pos)?),
            InjectionCMode::Rein => {
                let production = self.calc_mode_rate_from_rates(self.state.rein(&controls.reinj_group));
                Ok(controls.target_reinj_fraction * production)
            }
            InjectionCMode::Vrep => {
                let reductions = self.state.injection_reduction(self.group);
                let mut voidage =
                    self.state.vrep(&controls.voidage_group) * controls.target_void_fraction;
                for (phase, pos) in self.phase_usage.active() {
                    if phase != controls.phase {
                        voidage -= reductions.get(pos).copied().unwrap_or(0.0) * self.coeff(pos)?;
                    }
                }
                Ok(voidage / self.coeff(self.pos)?)
            }
            InjectionCMode::Sale => {
                // Import and consumption are already part of REIN.
                let available = self.calc_mode_rate_from_rates(self.state.rein(self.group));
                Ok(available - self.sales_target)
            }
            other => Err(ControlError::unsupported(self.group, other)),
        }
    }

    pub fn guide_target_mode(&self) -> GuideRateTarget {
        self.target
    }
}
