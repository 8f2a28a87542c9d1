//! Case files: a deck plus the simulator-side inputs of one iteration.
//!
//! ```yaml
//! deck: deck.yaml        # relative to the case file
//! report_step: 0
//! phases: { water: true, oil: true, gas: true }
//! wells:
//!   W1: { surface_rates: [0.0, -20.0, 0.0], producer_control: ORAT }
//! guide_rates:
//!   W1: { value: 3.0, target: OIL }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wg_control::{ControlContext, update_group_controls};
use wg_core::PhaseUsage;
use wg_schedule::{Schedule, ScheduleStep, SummaryState};
use wg_state::{GuideRate, GuideRateValue, RateVector, WellRecord, WellState};

use crate::error::{CliError, CliResult};
use crate::vfp::{LinearVfp, LinearVfpTable};

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSet {
    #[serde(default = "yes")]
    pub water: bool,
    #[serde(default = "yes")]
    pub oil: bool,
    #[serde(default = "yes")]
    pub gas: bool,
}

impl Default for PhaseSet {
    fn default() -> Self {
        Self {
            water: true,
            oil: true,
            gas: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseDef {
    pub deck: PathBuf,
    #[serde(default)]
    pub report_step: usize,
    #[serde(default)]
    pub phases: PhaseSet,
    #[serde(default)]
    pub summary: SummaryState,
    /// Surface to reservoir volume factors per active phase; ones if empty.
    #[serde(default)]
    pub resv_coefficients: Vec<f64>,
    #[serde(default)]
    pub wells: BTreeMap<String, WellRecord>,
    #[serde(default)]
    pub guide_rates: BTreeMap<String, GuideRateValue>,
    #[serde(default)]
    pub potentials: BTreeMap<String, RateVector>,
    #[serde(default)]
    pub grat_targets_from_sales: BTreeMap<String, f64>,
    #[serde(default)]
    pub vfp_tables: Vec<LinearVfpTable>,
}

/// A loaded case, ready for one round of group-control updates.
#[derive(Debug)]
pub struct Case {
    pub schedule: Schedule,
    pub report_step: usize,
    pub phase_usage: PhaseUsage,
    pub summary: SummaryState,
    pub resv_coeff: Vec<f64>,
    pub state: WellState,
    pub guide_rate: GuideRate,
    pub vfp: LinearVfp,
}

impl Case {
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::CaseFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let def: CaseDef = serde_yaml::from_str(&content)?;
        let deck_path = path.parent().unwrap_or(Path::new(".")).join(&def.deck);
        let schedule = wg_schedule::load_yaml(&deck_path)?;
        Self::from_def(def, schedule)
    }

    pub fn from_def(def: CaseDef, schedule: Schedule) -> CliResult<Self> {
        schedule.step(def.report_step)?;
        let pu = PhaseUsage::new(def.phases.water, def.phases.oil, def.phases.gas)?;

        let resv_coeff = if def.resv_coefficients.is_empty() {
            vec![1.0; pu.num_phases()]
        } else {
            pu.check_len("resv_coefficients", &def.resv_coefficients)?;
            def.resv_coefficients
        };

        let mut state = WellState::new(pu);
        for (name, record) in def.wells {
            state.insert_well(name, record)?;
        }
        for (group, target) in def.grat_targets_from_sales {
            state.set_grat_target_from_sales(&group, target);
        }

        let mut guide_rate = GuideRate::new();
        for (name, gr) in def.guide_rates {
            guide_rate.set_production(name, gr.value, gr.target);
        }
        for (name, potentials) in def.potentials {
            guide_rate.set_potentials(name, potentials);
        }

        Ok(Self {
            schedule,
            report_step: def.report_step,
            phase_usage: pu,
            summary: def.summary,
            resv_coeff,
            state,
            guide_rate,
            vfp: LinearVfp::new(def.vfp_tables)?,
        })
    }

    pub fn step(&self) -> CliResult<&ScheduleStep> {
        Ok(self.schedule.step(self.report_step)?)
    }

    /// Refresh group controls, reductions and rates from the current well
    /// state, which also serves as the frozen snapshot.
    pub fn update(&mut self) -> CliResult<()> {
        let step = self.schedule.step(self.report_step)?;
        let ctx = ControlContext::new(step, &self.summary, &self.phase_usage);
        let nupcol = self.state.clone();
        update_group_controls(&ctx, &mut self.guide_rate, &nupcol, &mut self.state)?;
        Ok(())
    }
}
