//! Per-group state carried alongside the well state.
//!
//! Every getter reads a missing entry as zeros (or `NONE` for controls); a
//! group that has not been visited yet is indistinguishable from one with
//! nothing flowing.

use std::collections::HashMap;

use wg_core::Phase;
use wg_schedule::{InjectionCMode, ProductionCMode};

use crate::error::StateResult;
use crate::well_state::WellState;

#[derive(Debug, Clone, Default)]
pub(crate) struct GroupState {
    production_control: HashMap<String, ProductionCMode>,
    injection_control: HashMap<(Phase, String), InjectionCMode>,
    production_reduction: HashMap<String, Vec<f64>>,
    injection_reduction: HashMap<String, Vec<f64>>,
    rein: HashMap<String, Vec<f64>>,
    vrep: HashMap<String, f64>,
    injection_reservoir_rates: HashMap<String, Vec<f64>>,
    production_rates: HashMap<String, Vec<f64>>,
    well_rates: HashMap<String, Vec<f64>>,
    grat_target_from_sales: HashMap<String, f64>,
}

fn rates_or<'a>(map: &'a HashMap<String, Vec<f64>>, name: &str, zeros: &'a [f64]) -> &'a [f64] {
    map.get(name).map_or(zeros, Vec::as_slice)
}

impl WellState {
    fn checked(&self, what: &str, rates: Vec<f64>) -> StateResult<Vec<f64>> {
        self.phase_usage().check_len(what, &rates)?;
        Ok(rates)
    }

    pub fn has_production_control(&self, group: &str) -> bool {
        self.groups.production_control.contains_key(group)
    }

    pub fn production_control(&self, group: &str) -> ProductionCMode {
        self.groups
            .production_control
            .get(group)
            .copied()
            .unwrap_or_default()
    }

    pub fn set_production_control(&mut self, group: &str, cmode: ProductionCMode) {
        self.groups
            .production_control
            .insert(group.to_string(), cmode);
    }

    pub fn has_injection_control(&self, phase: Phase, group: &str) -> bool {
        self.groups
            .injection_control
            .contains_key(&(phase, group.to_string()))
    }

    pub fn injection_control(&self, phase: Phase, group: &str) -> InjectionCMode {
        self.groups
            .injection_control
            .get(&(phase, group.to_string()))
            .copied()
            .unwrap_or_default()
    }

    pub fn set_injection_control(&mut self, phase: Phase, group: &str, cmode: InjectionCMode) {
        self.groups
            .injection_control
            .insert((phase, group.to_string()), cmode);
    }

    /// Production target already taken by descendants outside guide-rate allocation.
    pub fn production_reduction(&self, group: &str) -> &[f64] {
        rates_or(&self.groups.production_reduction, group, &self.zeros)
    }

    pub fn set_production_reduction(&mut self, group: &str, rates: Vec<f64>) -> StateResult<()> {
        let rates = self.checked("production reduction", rates)?;
        self.groups
            .production_reduction
            .insert(group.to_string(), rates);
        Ok(())
    }

    /// Injection target already taken by descendants outside guide-rate allocation.
    pub fn injection_reduction(&self, group: &str) -> &[f64] {
        rates_or(&self.groups.injection_reduction, group, &self.zeros)
    }

    pub fn set_injection_reduction(&mut self, group: &str, rates: Vec<f64>) -> StateResult<()> {
        let rates = self.checked("injection reduction", rates)?;
        self.groups
            .injection_reduction
            .insert(group.to_string(), rates);
        Ok(())
    }

    /// Rates available for re-injection at a group.
    pub fn rein(&self, group: &str) -> &[f64] {
        rates_or(&self.groups.rein, group, &self.zeros)
    }

    pub fn set_rein(&mut self, group: &str, rates: Vec<f64>) -> StateResult<()> {
        let rates = self.checked("REIN rates", rates)?;
        self.groups.rein.insert(group.to_string(), rates);
        Ok(())
    }

    /// Total reservoir voidage of a group.
    pub fn vrep(&self, group: &str) -> f64 {
        self.groups.vrep.get(group).copied().unwrap_or(0.0)
    }

    pub fn set_vrep(&mut self, group: &str, voidage: f64) {
        self.groups.vrep.insert(group.to_string(), voidage);
    }

    pub fn injection_reservoir_rates(&self, group: &str) -> &[f64] {
        rates_or(&self.groups.injection_reservoir_rates, group, &self.zeros)
    }

    pub fn set_injection_reservoir_rates(&mut self, group: &str, rates: Vec<f64>) -> StateResult<()> {
        let rates = self.checked("injection reservoir rates", rates)?;
        self.groups
            .injection_reservoir_rates
            .insert(group.to_string(), rates);
        Ok(())
    }

    pub fn production_group_rates(&self, group: &str) -> &[f64] {
        rates_or(&self.groups.production_rates, group, &self.zeros)
    }

    pub fn set_production_group_rates(&mut self, group: &str, rates: Vec<f64>) -> StateResult<()> {
        let rates = self.checked("production group rates", rates)?;
        self.groups
            .production_rates
            .insert(group.to_string(), rates);
        Ok(())
    }

    /// Current rates of a well, positive for both producers and injectors.
    pub fn current_well_rates(&self, well: &str) -> &[f64] {
        rates_or(&self.groups.well_rates, well, &self.zeros)
    }

    pub fn set_current_well_rates(&mut self, well: &str, rates: Vec<f64>) -> StateResult<()> {
        let rates = self.checked("current well rates", rates)?;
        self.groups.well_rates.insert(well.to_string(), rates);
        Ok(())
    }

    pub fn has_grat_target_from_sales(&self, group: &str) -> bool {
        self.groups.grat_target_from_sales.contains_key(group)
    }

    pub fn grat_target_from_sales(&self, group: &str) -> f64 {
        self.groups
            .grat_target_from_sales
            .get(group)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set_grat_target_from_sales(&mut self, group: &str, target: f64) {
        self.groups
            .grat_target_from_sales
            .insert(group.to_string(), target);
    }
}
