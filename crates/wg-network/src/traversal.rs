//! Parent-before-child ordering of network nodes.
//!
//! Discovery uses an explicit stack rather than recursion so that arbitrarily
//! deep networks do not grow the call stack.

use std::collections::BTreeSet;

use crate::network::ExtNetwork;

/// Nodes ordered so that every child appears after its parent, plus the leaf set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalOrder {
    root_to_leaf: Vec<String>,
    leaves: BTreeSet<String>,
}

impl TraversalOrder {
    /// Nodes with each parent before its children.
    pub fn root_to_leaf(&self) -> &[String] {
        &self.root_to_leaf
    }

    /// Nodes with each child before its parent.
    pub fn leaf_to_root(&self) -> impl Iterator<Item = &str> + '_ {
        self.root_to_leaf.iter().rev().map(String::as_str)
    }

    /// Nodes without downtree branches.
    pub fn leaves(&self) -> &BTreeSet<String> {
        &self.leaves
    }

    pub fn is_leaf(&self, name: &str) -> bool {
        self.leaves.contains(name)
    }
}

impl ExtNetwork {
    /// Walk every tree from its root and record the visiting order and the leaves.
    pub fn traversal_order(&self) -> TraversalOrder {
        let mut order = TraversalOrder::default();
        let mut stack: Vec<&str> = Vec::new();

        for root in self.roots() {
            stack.push(&root.name);
            while let Some(node) = stack.pop() {
                order.root_to_leaf.push(node.to_string());
                let mut has_children = false;
                for branch in self.downtree_branches(node) {
                    has_children = true;
                    stack.push(branch.downtree_node());
                }
                if !has_children {
                    order.leaves.insert(node.to_string());
                }
            }
        }

        order
    }
}
