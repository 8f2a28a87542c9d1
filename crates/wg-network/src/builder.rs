//! Incremental network builder.

use std::collections::HashMap;

use wg_core::Pressure;

use crate::error::NetworkResult;
use crate::network::{Branch, ExtNetwork, NetworkNode};
use crate::validate;

/// Builder for constructing a network incrementally.
///
/// Nodes are created on first mention, either explicitly or through a branch.
/// Call `build()` to validate and freeze the result into an [`ExtNetwork`].
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    nodes: Vec<NetworkNode>,
    node_index: HashMap<String, usize>,
    branches: Vec<Branch>,
}

impl NetworkBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node (no-op if it already exists).
    pub fn add_node(&mut self, name: impl Into<String>) -> &mut Self {
        self.ensure_node(name.into());
        self
    }

    /// Add a branch from `uptree` down to `downtree`, creating both nodes if needed.
    pub fn add_branch(
        &mut self,
        uptree: impl Into<String>,
        downtree: impl Into<String>,
        vfp_table: Option<u32>,
    ) -> &mut Self {
        let uptree = uptree.into();
        let downtree = downtree.into();
        self.ensure_node(uptree.clone());
        self.ensure_node(downtree.clone());
        self.branches.push(Branch::new(uptree, downtree, vfp_table));
        self
    }

    /// Fix the pressure of a node.
    pub fn set_terminal_pressure(&mut self, name: impl Into<String>, pressure: Pressure) -> &mut Self {
        let i = self.ensure_node(name.into());
        self.nodes[i].terminal_pressure = Some(pressure);
        self
    }

    /// Request that gas-lift gas is added to the node's gas inflow.
    pub fn set_add_gas_lift_gas(&mut self, name: impl Into<String>, add: bool) -> &mut Self {
        let i = self.ensure_node(name.into());
        self.nodes[i].add_gas_lift_gas = add;
        self
    }

    /// Build and validate the network.
    pub fn build(self) -> NetworkResult<ExtNetwork> {
        let n = self.nodes.len();
        let mut downtree = vec![Vec::new(); n];
        let mut uptree = vec![None; n];

        validate::validate_branches(&self.branches)?;

        for (b, branch) in self.branches.iter().enumerate() {
            let up = self.node_index[branch.uptree_node()];
            let down = self.node_index[branch.downtree_node()];
            downtree[up].push(b);
            if uptree[down].replace(b).is_some() {
                return Err(crate::NetworkError::MultipleUptree {
                    node: branch.downtree_node().to_string(),
                });
            }
        }

        let network = ExtNetwork {
            nodes: self.nodes,
            branches: self.branches,
            node_index: self.node_index,
            downtree,
            uptree,
        };
        validate::validate_roots(&network)?;
        Ok(network)
    }

    fn ensure_node(&mut self, name: String) -> usize {
        if let Some(&i) = self.node_index.get(&name) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(NetworkNode::new(name.clone()));
        self.node_index.insert(name, i);
        i
    }
}
