//! Core network data structures.

use std::collections::HashMap;

use wg_core::Pressure;

/// VFP table id that declares a branch without pressure loss.
pub const NO_PRESSURE_LOSS_TABLE: u32 = 9999;

/// A node of the extended network.
///
/// Leaf nodes carry the name of the production group whose rates flow in.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkNode {
    pub name: String,
    /// Fixed pressure, set for roots and optionally for inner nodes.
    pub terminal_pressure: Option<Pressure>,
    /// Add the gas-lift gas of the group's wells to the gas inflow.
    pub add_gas_lift_gas: bool,
}

impl NetworkNode {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            terminal_pressure: None,
            add_gas_lift_gas: false,
        }
    }
}

/// A directed branch from an uptree node down to a downtree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    uptree: String,
    downtree: String,
    vfp_table: Option<u32>,
}

impl Branch {
    /// Create a branch. Table id [`NO_PRESSURE_LOSS_TABLE`] is stored as no table.
    pub fn new(uptree: impl Into<String>, downtree: impl Into<String>, vfp_table: Option<u32>) -> Self {
        Self {
            uptree: uptree.into(),
            downtree: downtree.into(),
            vfp_table: vfp_table.filter(|&t| t != NO_PRESSURE_LOSS_TABLE),
        }
    }

    pub fn uptree_node(&self) -> &str {
        &self.uptree
    }

    pub fn downtree_node(&self) -> &str {
        &self.downtree
    }

    /// VFP table used for the pressure drop across this branch, if any.
    pub fn vfp_table(&self) -> Option<u32> {
        self.vfp_table
    }
}

/// The network: a validated, immutable forest of nodes and branches.
#[derive(Debug, Clone, Default)]
pub struct ExtNetwork {
    pub(crate) nodes: Vec<NetworkNode>,
    pub(crate) branches: Vec<Branch>,
    pub(crate) node_index: HashMap<String, usize>,
    /// Per node: indices of branches leaving it downtree, in declaration order.
    pub(crate) downtree: Vec<Vec<usize>>,
    /// Per node: index of the branch arriving from uptree.
    pub(crate) uptree: Vec<Option<usize>>,
}

impl ExtNetwork {
    /// An empty, inactive network.
    pub fn inactive() -> Self {
        Self::default()
    }

    /// True when the network has any nodes.
    pub fn active(&self) -> bool {
        !self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NetworkNode] {
        &self.nodes
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn has_node(&self, name: &str) -> bool {
        self.node_index.contains_key(name)
    }

    pub fn node(&self, name: &str) -> Option<&NetworkNode> {
        self.node_index.get(name).map(|&i| &self.nodes[i])
    }

    /// Nodes without an uptree branch, in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = &NetworkNode> + '_ {
        self.nodes
            .iter()
            .zip(&self.uptree)
            .filter(|(_, up)| up.is_none())
            .map(|(node, _)| node)
    }

    /// Branches leaving `name` towards its children.
    pub fn downtree_branches(&self, name: &str) -> impl Iterator<Item = &Branch> + '_ {
        let branches = self
            .node_index
            .get(name)
            .map(|&i| self.downtree[i].as_slice())
            .unwrap_or(&[]);
        branches.iter().map(|&b| &self.branches[b])
    }

    /// The branch connecting `name` to its parent, if `name` is not a root.
    pub fn uptree_branch(&self, name: &str) -> Option<&Branch> {
        let i = *self.node_index.get(name)?;
        self.uptree[i].map(|b| &self.branches[b])
    }
}
