//! Per-well state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use wg_core::{PhaseUsage, ensure_finite};

use crate::error::{StateError, StateResult};
use crate::group_state::GroupState;

/// Current individual control of a producing well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProducerControl {
    Orat,
    Wrat,
    Grat,
    Lrat,
    Resv,
    Bhp,
    Thp,
    /// Under group control.
    Grup,
    #[default]
    Undefined,
}

/// Current individual control of an injecting well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InjectorControl {
    Rate,
    Resv,
    Bhp,
    Thp,
    /// Under group control.
    Grup,
    #[default]
    Undefined,
}

fn owned() -> bool {
    true
}

/// Rates and controls of one well.
///
/// Surface and reservoir rates carry one entry per active phase and follow
/// the simulator convention: production negative, injection positive.
/// Rates are checked when the record enters a [`WellState`] and can only be
/// changed through its setters afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellRecord {
    surface_rates: Vec<f64>,
    #[serde(default)]
    reservoir_rates: Vec<f64>,
    #[serde(default)]
    solvent_rate: f64,
    /// False when another process owns the well.
    #[serde(default = "owned")]
    owned: bool,
    #[serde(default)]
    producer_control: ProducerControl,
    #[serde(default)]
    injector_control: InjectorControl,
    /// Artificial-lift quantity (gas-lift gas rate).
    #[serde(default)]
    alq: f64,
}

impl WellRecord {
    pub fn new(surface_rates: Vec<f64>) -> Self {
        Self {
            surface_rates,
            reservoir_rates: Vec::new(),
            solvent_rate: 0.0,
            owned: true,
            producer_control: ProducerControl::Undefined,
            injector_control: InjectorControl::Undefined,
            alq: 0.0,
        }
    }

    pub fn with_reservoir_rates(mut self, rates: Vec<f64>) -> Self {
        self.reservoir_rates = rates;
        self
    }

    pub fn with_solvent_rate(mut self, rate: f64) -> Self {
        self.solvent_rate = rate;
        self
    }

    pub fn with_producer_control(mut self, control: ProducerControl) -> Self {
        self.producer_control = control;
        self
    }

    pub fn with_injector_control(mut self, control: InjectorControl) -> Self {
        self.injector_control = control;
        self
    }

    pub fn with_alq(mut self, alq: f64) -> Self {
        self.alq = alq;
        self
    }

    pub fn not_owned(mut self) -> Self {
        self.owned = false;
        self
    }

    pub fn surface_rates(&self) -> &[f64] {
        &self.surface_rates
    }

    pub fn reservoir_rates(&self) -> &[f64] {
        &self.reservoir_rates
    }

    pub fn solvent_rate(&self) -> f64 {
        self.solvent_rate
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }

    pub fn producer_control(&self) -> ProducerControl {
        self.producer_control
    }

    pub fn injector_control(&self) -> InjectorControl {
        self.injector_control
    }

    pub fn alq(&self) -> f64 {
        self.alq
    }
}

fn check_rates(phase_usage: &PhaseUsage, what: &'static str, rates: &[f64]) -> StateResult<()> {
    phase_usage.check_len(what, rates)?;
    for &rate in rates {
        ensure_finite(rate, what)?;
    }
    Ok(())
}

/// Well and group state for one process.
#[derive(Debug, Clone)]
pub struct WellState {
    phase_usage: PhaseUsage,
    pub(crate) zeros: Vec<f64>,
    well_index: HashMap<String, usize>,
    names: Vec<String>,
    records: Vec<WellRecord>,
    pub(crate) groups: GroupState,
}

impl WellState {
    pub fn new(phase_usage: PhaseUsage) -> Self {
        Self {
            phase_usage,
            zeros: vec![0.0; phase_usage.num_phases()],
            well_index: HashMap::new(),
            names: Vec::new(),
            records: Vec::new(),
            groups: GroupState::default(),
        }
    }

    pub fn phase_usage(&self) -> &PhaseUsage {
        &self.phase_usage
    }

    pub fn num_phases(&self) -> usize {
        self.phase_usage.num_phases()
    }

    /// Add a well. Missing reservoir rates default to zeros; rates must be finite.
    pub fn insert_well(&mut self, name: impl Into<String>, mut record: WellRecord) -> StateResult<usize> {
        let name = name.into();
        if self.well_index.contains_key(&name) {
            return Err(StateError::DuplicateWell { name });
        }
        if record.reservoir_rates.is_empty() {
            record.reservoir_rates = self.zeros.clone();
        }
        check_rates(&self.phase_usage, "well surface rates", &record.surface_rates)?;
        check_rates(&self.phase_usage, "well reservoir rates", &record.reservoir_rates)?;
        ensure_finite(record.solvent_rate, "well solvent rate")?;
        ensure_finite(record.alq, "well ALQ")?;

        let index = self.records.len();
        self.well_index.insert(name.clone(), index);
        self.names.push(name);
        self.records.push(record);
        Ok(index)
    }

    pub fn has_well(&self, name: &str) -> bool {
        self.well_index.contains_key(name)
    }

    pub fn well_index(&self, name: &str) -> Option<usize> {
        self.well_index.get(name).copied()
    }

    pub fn well(&self, name: &str) -> Option<&WellRecord> {
        self.well_index(name).map(|i| &self.records[i])
    }

    fn well_mut(&mut self, name: &str) -> StateResult<&mut WellRecord> {
        match self.well_index.get(name) {
            Some(&i) => Ok(&mut self.records[i]),
            None => Err(StateError::UnknownWell {
                name: name.to_string(),
            }),
        }
    }

    /// Well names in insertion order.
    pub fn well_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    pub fn is_owned(&self, name: &str) -> bool {
        self.well(name).is_some_and(|w| w.owned)
    }

    pub fn surface_rates(&self, name: &str) -> Option<&[f64]> {
        self.well(name).map(|w| w.surface_rates.as_slice())
    }

    pub fn reservoir_rates(&self, name: &str) -> Option<&[f64]> {
        self.well(name).map(|w| w.reservoir_rates.as_slice())
    }

    pub fn solvent_rate(&self, name: &str) -> Option<f64> {
        self.well(name).map(|w| w.solvent_rate)
    }

    /// ALQ of a well; zero when the well is absent.
    pub fn alq(&self, name: &str) -> f64 {
        self.well(name).map_or(0.0, |w| w.alq)
    }

    pub fn is_production_grup(&self, name: &str) -> bool {
        self.well(name)
            .is_some_and(|w| w.producer_control == ProducerControl::Grup)
    }

    pub fn is_injection_grup(&self, name: &str) -> bool {
        self.well(name)
            .is_some_and(|w| w.injector_control == InjectorControl::Grup)
    }

    pub fn set_surface_rates(&mut self, name: &str, rates: Vec<f64>) -> StateResult<()> {
        check_rates(&self.phase_usage, "well surface rates", &rates)?;
        self.well_mut(name)?.surface_rates = rates;
        Ok(())
    }

    pub fn set_reservoir_rates(&mut self, name: &str, rates: Vec<f64>) -> StateResult<()> {
        check_rates(&self.phase_usage, "well reservoir rates", &rates)?;
        self.well_mut(name)?.reservoir_rates = rates;
        Ok(())
    }

    pub fn set_solvent_rate(&mut self, name: &str, rate: f64) -> StateResult<()> {
        ensure_finite(rate, "well solvent rate")?;
        self.well_mut(name)?.solvent_rate = rate;
        Ok(())
    }

    pub fn set_alq(&mut self, name: &str, alq: f64) -> StateResult<()> {
        ensure_finite(alq, "well ALQ")?;
        self.well_mut(name)?.alq = alq;
        Ok(())
    }

    pub fn set_producer_control(&mut self, name: &str, control: ProducerControl) -> StateResult<()> {
        self.well_mut(name)?.producer_control = control;
        Ok(())
    }

    pub fn set_injector_control(&mut self, name: &str, control: InjectorControl) -> StateResult<()> {
        self.well_mut(name)?.injector_control = control;
        Ok(())
    }
}
