//! Guide-rate registry.
//!
//! Production guide rates are stored per well or group together with the
//! phase they were given for; a lookup for another phase scales the stored
//! value by the ratio of the entity's current rates. Injection group guide
//! rates are stored per phase.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;
use wg_core::{GUIDE_RATE_EPSILON, Phase, PhaseUsage};
use wg_schedule::GuideRateInjTarget;

/// Quantity a guide rate refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GuideRateTarget {
    Oil,
    Gas,
    Water,
    Liquid,
    Resv,
    #[default]
    None,
}

/// Positive surface rates of a well or group.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RateVector {
    #[serde(default)]
    pub oil: f64,
    #[serde(default)]
    pub gas: f64,
    #[serde(default)]
    pub water: f64,
}

impl RateVector {
    pub fn new(oil: f64, gas: f64, water: f64) -> Self {
        Self { oil, gas, water }
    }

    /// Pick oil, gas and water out of a phase-ordered rate vector.
    pub fn from_rates(pu: &PhaseUsage, rates: &[f64]) -> Self {
        Self {
            oil: pu.component(rates, Phase::Oil),
            gas: pu.component(rates, Phase::Gas),
            water: pu.component(rates, Phase::Water),
        }
    }

    /// Rate for a guide-rate target; reservoir volume has no surface equivalent.
    pub fn eval(&self, target: GuideRateTarget) -> Option<f64> {
        match target {
            GuideRateTarget::Oil => Some(self.oil),
            GuideRateTarget::Gas => Some(self.gas),
            GuideRateTarget::Water => Some(self.water),
            GuideRateTarget::Liquid => Some(self.oil + self.water),
            GuideRateTarget::Resv | GuideRateTarget::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuideRateValue {
    pub value: f64,
    pub target: GuideRateTarget,
}

#[derive(Debug, Clone, Default)]
pub struct GuideRate {
    production: HashMap<String, GuideRateValue>,
    injection: HashMap<(Phase, String), f64>,
    potentials: HashMap<String, RateVector>,
}

impl GuideRate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_production(&mut self, name: impl Into<String>, value: f64, target: GuideRateTarget) {
        self.production
            .insert(name.into(), GuideRateValue { value, target });
    }

    /// Rate potentials used for wells without a registered guide rate.
    pub fn set_potentials(&mut self, name: impl Into<String>, potentials: RateVector) {
        self.potentials.insert(name.into(), potentials);
    }

    pub fn set_injection(&mut self, name: impl Into<String>, phase: Phase, value: f64) {
        self.injection.insert((phase, name.into()), value);
    }

    /// Whether a production guide rate is registered for a well or group.
    pub fn has(&self, name: &str) -> bool {
        self.production.contains_key(name)
    }

    pub fn has_injection(&self, name: &str, phase: Phase) -> bool {
        self.injection.contains_key(&(phase, name.to_string()))
    }

    /// Production guide rate of `name` expressed for `target`.
    ///
    /// Falls back to the potentials for `target`, then to zero.
    pub fn get(&self, name: &str, target: GuideRateTarget, rates: &RateVector) -> f64 {
        let Some(stored) = self.production.get(name) else {
            return self
                .potentials
                .get(name)
                .and_then(|pot| pot.eval(target))
                .unwrap_or(0.0);
        };
        if stored.target == target {
            return stored.value;
        }
        match (rates.eval(stored.target), rates.eval(target)) {
            (Some(from), Some(to)) if from > GUIDE_RATE_EPSILON => stored.value * to / from,
            _ => {
                trace!(name, ?target, stored = ?stored.target, "guide rate not convertible");
                0.0
            }
        }
    }

    pub fn get_injection(&self, name: &str, phase: Phase) -> f64 {
        self.injection
            .get(&(phase, name.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Register a computed injection group guide rate.
    ///
    /// Groups declared without a guide rate are left alone. A positive
    /// computed value wins; otherwise the declared value is used, except
    /// for potential-based guide rates which stay unset.
    pub fn compute_injection(
        &mut self,
        name: &str,
        phase: Phase,
        value: f64,
        definition: GuideRateInjTarget,
        declared: f64,
    ) {
        if definition == GuideRateInjTarget::NoGuideRate {
            return;
        }
        let key = (phase, name.to_string());
        if value > 0.0 {
            self.injection.insert(key, value);
            return;
        }
        if definition == GuideRateInjTarget::Potn {
            return;
        }
        self.injection.insert(key, declared);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_target_returns_stored_value() {
        let mut gr = GuideRate::new();
        gr.set_production("W1", 3.0, GuideRateTarget::Oil);
        assert_eq!(gr.get("W1", GuideRateTarget::Oil, &RateVector::default()), 3.0);
    }

    #[test]
    fn other_target_scales_by_rate_ratio() {
        let mut gr = GuideRate::new();
        gr.set_production("W1", 10.0, GuideRateTarget::Oil);
        let rates = RateVector::new(50.0, 200.0, 25.0);
        assert_eq!(gr.get("W1", GuideRateTarget::Gas, &rates), 40.0);
        assert_eq!(gr.get("W1", GuideRateTarget::Liquid, &rates), 15.0);
        assert_eq!(gr.get("W1", GuideRateTarget::Resv, &rates), 0.0);
    }

    #[test]
    fn zero_source_rate_gives_zero() {
        let mut gr = GuideRate::new();
        gr.set_production("W1", 10.0, GuideRateTarget::Water);
        let rates = RateVector::new(50.0, 0.0, 0.0);
        assert_eq!(gr.get("W1", GuideRateTarget::Oil, &rates), 0.0);
    }

    #[test]
    fn potentials_back_unregistered_wells() {
        let mut gr = GuideRate::new();
        gr.set_potentials("W2", RateVector::new(7.0, 1.0, 2.0));
        assert!(!gr.has("W2"));
        assert_eq!(gr.get("W2", GuideRateTarget::Liquid, &RateVector::default()), 9.0);
        assert_eq!(gr.get("W3", GuideRateTarget::Oil, &RateVector::default()), 0.0);
    }

    #[test]
    fn injection_compute_rules() {
        let mut gr = GuideRate::new();
        gr.compute_injection("G1", Phase::Water, 5.0, GuideRateInjTarget::NoGuideRate, 1.0);
        assert!(!gr.has_injection("G1", Phase::Water));

        gr.compute_injection("G1", Phase::Water, 5.0, GuideRateInjTarget::Void, 1.0);
        assert_eq!(gr.get_injection("G1", Phase::Water), 5.0);

        gr.compute_injection("G2", Phase::Water, 0.0, GuideRateInjTarget::Rate, 2.5);
        assert_eq!(gr.get_injection("G2", Phase::Water), 2.5);

        gr.compute_injection("G3", Phase::Gas, 0.0, GuideRateInjTarget::Potn, 2.5);
        assert!(!gr.has_injection("G3", Phase::Gas));
    }

    #[test]
    fn rate_vector_from_two_phase_rates() {
        let pu = PhaseUsage::new(true, true, false).unwrap();
        let rv = RateVector::from_rates(&pu, &[4.0, 6.0]);
        assert_eq!(rv, RateVector::new(6.0, 0.0, 4.0));
    }
}
