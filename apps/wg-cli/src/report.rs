//! Serializable views of the refreshed state.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;
use wg_control::{ConstraintChecker, ControlContext, GroupConstraintCheck, compute_network_pressures};
use wg_core::{Phase, to_bar};
use wg_schedule::{InjectionCMode, ProductionCMode, WellRole};

use crate::case::Case;
use crate::error::CliResult;

#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub name: String,
    pub production_control: ProductionCMode,
    pub injection_controls: BTreeMap<Phase, InjectionCMode>,
    pub production_reduction: Vec<f64>,
    pub injection_reduction: Vec<f64>,
    pub production_rates: Vec<f64>,
    pub rein: Vec<f64>,
    pub vrep: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WellCheck {
    pub well: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    #[serde(flatten)]
    pub check: GroupConstraintCheck,
}

pub fn group_reports(case: &Case) -> CliResult<Vec<GroupReport>> {
    let step = case.step()?;
    let state = &case.state;
    let reports = step
        .groups()
        .map(|g| {
            let name = g.name();
            let injection_controls = case
                .phase_usage
                .active()
                .filter(|&(phase, _)| state.has_injection_control(phase, name))
                .map(|(phase, _)| (phase, state.injection_control(phase, name)))
                .collect();
            GroupReport {
                name: name.to_string(),
                production_control: state.production_control(name),
                injection_controls,
                production_reduction: state.production_reduction(name).to_vec(),
                injection_reduction: state.injection_reduction(name).to_vec(),
                production_rates: state.production_group_rates(name).to_vec(),
                rein: state.rein(name).to_vec(),
                vrep: state.vrep(name),
            }
        })
        .collect();
    Ok(reports)
}

/// Group constraint checks of every open well in the state.
///
/// Injectors are checked per active phase; phases without a binding group
/// control are left out.
pub fn well_checks(case: &Case) -> CliResult<Vec<WellCheck>> {
    let step = case.step()?;
    let ctx = ControlContext::new(step, &case.summary, &case.phase_usage);
    let checker = ConstraintChecker::new(ctx, &case.state, &case.guide_rate, &case.resv_coeff);

    let mut checks = Vec::new();
    for well in step.wells() {
        if well.is_shut() {
            continue;
        }
        let Some(rates) = case.state.surface_rates(&well.name) else {
            warn!(well = %well.name, "well has no rates in the case, not checked");
            continue;
        };
        let group = step.group(&well.group)?;
        match well.role {
            WellRole::Producer => {
                let check = checker.check_production(&well.name, group, rates, well.efficiency_factor)?;
                checks.push(WellCheck {
                    well: well.name.clone(),
                    phase: None,
                    check,
                });
            }
            WellRole::Injector => {
                for (phase, _) in case.phase_usage.active() {
                    let check =
                        checker.check_injection(&well.name, group, rates, phase, well.efficiency_factor)?;
                    if check.binding.is_some() {
                        checks.push(WellCheck {
                            well: well.name.clone(),
                            phase: Some(phase),
                            check,
                        });
                    }
                }
            }
        }
    }
    Ok(checks)
}

/// Network node pressures in bar.
pub fn network_pressures(case: &Case) -> CliResult<BTreeMap<String, f64>> {
    let step = case.step()?;
    let ctx = ControlContext::new(step, &case.summary, &case.phase_usage);
    let pressures = compute_network_pressures(&ctx, &case.state, &case.vfp)?;
    Ok(pressures
        .into_iter()
        .map(|(node, p)| (node, to_bar(p)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn demo() -> Case {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/field/case.yaml");
        let mut case = Case::load(&path).unwrap();
        case.update().unwrap();
        case
    }

    #[test]
    fn demo_groups_are_refreshed() {
        let case = demo();
        let reports = group_reports(&case).unwrap();
        let g1 = reports.iter().find(|r| r.name == "G1").unwrap();
        assert_eq!(g1.production_control, ProductionCMode::Orat);
        assert_eq!(g1.production_reduction, vec![0.0, 20.0, 10.0]);
        assert_eq!(g1.production_rates, vec![0.0, 50.0, 25.0]);

        let inj = reports.iter().find(|r| r.name == "INJ").unwrap();
        assert_eq!(inj.injection_controls[&Phase::Water], InjectionCMode::Vrep);
        let field = reports.iter().find(|r| r.name == "FIELD").unwrap();
        assert_eq!(field.vrep, 80.0);
    }

    #[test]
    fn demo_well_checks() {
        let case = demo();
        let checks = well_checks(&case).unwrap();

        let w1 = checks.iter().find(|c| c.well == "W1").unwrap();
        assert!((w1.check.target_rate().unwrap() - 75.0).abs() < 1e-9);
        assert!(!w1.check.violated);

        // W1 is individually controlled, so W2 gets the whole remainder.
        let w2 = checks.iter().find(|c| c.well == "W2").unwrap();
        assert!((w2.check.target_rate().unwrap() - 110.0).abs() < 1e-9);
        assert!(!w2.check.violated);

        let i1 = checks.iter().find(|c| c.well == "I1").unwrap();
        assert_eq!(i1.phase, Some(Phase::Water));
        assert!((i1.check.target_rate().unwrap() - 140.0).abs() < 1e-9);
    }

    #[test]
    fn demo_network_pressures() {
        let case = demo();
        let pressures = network_pressures(&case).unwrap();
        assert!((pressures["SINK"] - 50.0).abs() < 1e-9);
        assert!((pressures["G1"] - 52.5).abs() < 1e-9);
    }

    #[test]
    fn checks_serialize_flat() {
        let case = demo();
        let json = serde_json::to_value(well_checks(&case).unwrap()).unwrap();
        let rows = json.as_array().unwrap();
        let w1 = rows.iter().find(|r| r["well"] == "W1").unwrap();
        assert!(w1.get("violated").is_some());
        assert!(w1.get("phase").is_none());
        let i1 = rows.iter().find(|r| r["well"] == "I1").unwrap();
        assert_eq!(i1["phase"], "water");
    }
}
