//! Structural validation of a report step.

use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use wg_network::ExtNetwork;

use crate::error::{ScheduleError, ScheduleResult};
use crate::group::Group;
use crate::well::Well;

fn check_factor(field: &str, factor: f64) -> ScheduleResult<()> {
    if factor.is_finite() && factor >= 0.0 {
        Ok(())
    } else {
        Err(ScheduleError::InvalidValue {
            field: field.to_string(),
            value: factor.to_string(),
            reason: "efficiency factor must be finite and non-negative".to_string(),
        })
    }
}

/// Check parent references, names, factors and acyclicity of the group tree.
pub(crate) fn validate_tree(groups: &[Group], wells: &[Well]) -> ScheduleResult<()> {
    let group_names: HashSet<&str> = groups.iter().map(|g| g.name()).collect();

    for group in groups {
        check_factor(&format!("{}.efficiency_factor", group.name()), group.efficiency_factor())?;
        if let Some(parent) = group.parent() {
            if !group_names.contains(parent) {
                return Err(ScheduleError::MissingParent {
                    group: group.name().to_string(),
                    parent: parent.to_string(),
                });
            }
        }
    }

    let mut well_names: HashSet<&str> = HashSet::new();
    for well in wells {
        if group_names.contains(well.name.as_str()) || !well_names.insert(well.name.as_str()) {
            return Err(ScheduleError::DuplicateName {
                name: well.name.clone(),
            });
        }
        if !group_names.contains(well.group.as_str()) {
            return Err(ScheduleError::UnknownGroup {
                name: well.group.clone(),
            });
        }
        check_factor(&format!("{}.efficiency_factor", well.name), well.efficiency_factor)?;
    }

    // Edges child -> parent; a topological order exists iff the tree is acyclic.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for group in groups {
        graph.add_node(group.name());
        if let Some(parent) = group.parent() {
            graph.add_edge(group.name(), parent, ());
        }
    }
    toposort(&graph, None).map_err(|cycle| ScheduleError::Cycle {
        group: cycle.node_id().to_string(),
    })?;

    Ok(())
}

/// Network leaves must name groups of this step.
pub(crate) fn validate_network(
    network: &ExtNetwork,
    group_index: &HashMap<String, usize>,
) -> ScheduleResult<()> {
    if !network.active() {
        return Ok(());
    }
    let order = network.traversal_order();
    for leaf in order.leaves() {
        if !group_index.contains_key(leaf) {
            return Err(ScheduleError::UnknownGroup { name: leaf.clone() });
        }
    }
    Ok(())
}
