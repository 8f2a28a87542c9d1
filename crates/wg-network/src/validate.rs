//! Network validation logic.

use std::collections::HashSet;

use crate::error::{NetworkError, NetworkResult};
use crate::network::{Branch, ExtNetwork};

/// Validate branch declarations before adjacency is built.
pub(crate) fn validate_branches(branches: &[Branch]) -> NetworkResult<()> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    for branch in branches {
        if branch.uptree_node() == branch.downtree_node() {
            return Err(NetworkError::SelfLoop {
                node: branch.uptree_node().to_string(),
            });
        }
        if !seen.insert((branch.uptree_node(), branch.downtree_node())) {
            return Err(NetworkError::DuplicateBranch {
                uptree: branch.uptree_node().to_string(),
                downtree: branch.downtree_node().to_string(),
            });
        }
    }
    Ok(())
}

/// Validate roots and reachability on a built network.
///
/// Every node must be reachable from a root, which rules out cycles since
/// each node has at most one uptree branch.
pub(crate) fn validate_roots(network: &ExtNetwork) -> NetworkResult<()> {
    if !network.active() {
        return Ok(());
    }

    let mut roots = 0;
    for root in network.roots() {
        roots += 1;
        if root.terminal_pressure.is_none() {
            return Err(NetworkError::RootWithoutPressure {
                node: root.name.clone(),
            });
        }
    }
    if roots == 0 {
        return Err(NetworkError::NoRoot);
    }

    let order = network.traversal_order();
    if order.root_to_leaf().len() != network.nodes().len() {
        let reached: HashSet<&str> = order.root_to_leaf().iter().map(String::as_str).collect();
        let missing = network
            .nodes()
            .iter()
            .find(|n| !reached.contains(n.name.as_str()))
            .map(|n| n.name.clone())
            .unwrap_or_default();
        return Err(NetworkError::Unreachable { node: missing });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_empty_branches() {
        assert!(validate_branches(&[]).is_ok());
    }

    #[test]
    fn validate_self_loop() {
        let branches = vec![Branch::new("A", "A", None)];
        assert_eq!(
            validate_branches(&branches).unwrap_err(),
            NetworkError::SelfLoop { node: "A".into() }
        );
    }

    #[test]
    fn validate_duplicate_branch() {
        let branches = vec![Branch::new("A", "B", None), Branch::new("A", "B", Some(2))];
        assert!(matches!(
            validate_branches(&branches),
            Err(NetworkError::DuplicateBranch { .. })
        ));
    }
}
