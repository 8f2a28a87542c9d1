//! Node pressures of the extended production network.
//!
//! Leaf nodes take their inflow from the production rates of the group of
//! the same name. Inflows are summed towards the roots, then pressures are
//! computed from the roots outwards: a node with a terminal pressure keeps
//! it, a branch with a VFP table gives the pressure from the table, and a
//! branch without one passes the uptree pressure through.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace};
use wg_core::{Phase, Pressure, to_bar};
use wg_state::WellState;

use crate::context::ControlContext;
use crate::error::{ControlError, ControlResult};

/// Production VFP table lookup.
///
/// Rates follow the production-negative sign convention.
pub trait VfpProduction {
    fn bhp(
        &self,
        table: u32,
        water: f64,
        oil: f64,
        gas: f64,
        thp: Pressure,
        alq: f64,
    ) -> ControlResult<Pressure>;
}

/// Pressure at every node of the step's network; empty if the network is inactive.
pub fn compute_network_pressures(
    ctx: &ControlContext<'_>,
    state: &WellState,
    vfp: &dyn VfpProduction,
) -> ControlResult<BTreeMap<String, Pressure>> {
    let network = ctx.step.network();
    if !network.active() {
        return Ok(BTreeMap::new());
    }

    ctx.check_layout(state)?;
    let pu = ctx.phase_usage;
    let np = pu.num_phases();
    let order = network.traversal_order();

    let mut inflows: HashMap<&str, Vec<f64>> = HashMap::new();
    for leaf in order.leaves() {
        let mut rates = state.production_group_rates(leaf).to_vec();
        if network.node(leaf).is_some_and(|n| n.add_gas_lift_gas) {
            match pu.pos(Phase::Gas).and_then(|gas| rates.get_mut(gas)) {
                Some(gas_rate) => {
                    for well in ctx.step.group(leaf)?.wells() {
                        *gas_rate += state.alq(well);
                    }
                }
                None => debug!(node = %leaf, "gas-lift gas requested without an active gas phase"),
            }
        }
        inflows.insert(leaf.as_str(), rates);
    }

    for node in order.leaf_to_root() {
        let Some(branch) = network.uptree_branch(node) else {
            continue;
        };
        let down = inflows.get(node).cloned().unwrap_or_else(|| vec![0.0; np]);
        let up = inflows
            .entry(branch.uptree_node())
            .or_insert_with(|| vec![0.0; np]);
        for (u, d) in up.iter_mut().zip(&down) {
            *u += d;
        }
    }

    let mut pressures: BTreeMap<String, Pressure> = BTreeMap::new();
    for node in order.root_to_leaf() {
        let terminal = network.node(node).and_then(|n| n.terminal_pressure);
        let pressure = match terminal {
            Some(p) => p,
            None => {
                let missing = || ControlError::NetworkNode { node: node.clone() };
                let branch = network.uptree_branch(node).ok_or_else(missing)?;
                let up = *pressures.get(branch.uptree_node()).ok_or_else(missing)?;
                match branch.vfp_table() {
                    Some(table) => {
                        let rates = inflows.get(node.as_str()).map_or(&[][..], Vec::as_slice);
                        let produced = |phase| -pu.component(rates, phase);
                        vfp.bhp(
                            table,
                            produced(Phase::Water),
                            produced(Phase::Oil),
                            produced(Phase::Gas),
                            up,
                            0.0,
                        )?
                    }
                    None => up,
                }
            }
        };
        trace!(node = %node, pressure_bar = to_bar(pressure), "network node pressure");
        pressures.insert(node.clone(), pressure);
    }

    Ok(pressures)
}
