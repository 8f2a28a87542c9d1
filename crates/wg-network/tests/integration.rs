//! Integration tests for wg-network.

use wg_core::bar;
use wg_network::{NO_PRESSURE_LOSS_TABLE, NetworkBuilder, NetworkError};

#[test]
fn build_minimal_network() {
    // ROOT -> G1
    let mut builder = NetworkBuilder::new();
    builder
        .add_branch("ROOT", "G1", Some(NO_PRESSURE_LOSS_TABLE))
        .set_terminal_pressure("ROOT", bar(50.0));
    let net = builder.build().unwrap();

    assert!(net.active());
    let branch = net.uptree_branch("G1").unwrap();
    assert_eq!(branch.uptree_node(), "ROOT");
    assert_eq!(branch.vfp_table(), None);
    assert!(net.uptree_branch("ROOT").is_none());

    let order = net.traversal_order();
    assert_eq!(order.root_to_leaf(), &["ROOT".to_string(), "G1".to_string()]);
    assert!(order.is_leaf("G1"));
    assert!(!order.is_leaf("ROOT"));
}

#[test]
fn empty_network_is_inactive() {
    let net = NetworkBuilder::new().build().unwrap();
    assert!(!net.active());
    assert!(net.traversal_order().root_to_leaf().is_empty());
}

#[test]
fn root_needs_pressure() {
    let mut builder = NetworkBuilder::new();
    builder.add_branch("ROOT", "G1", None);
    assert_eq!(
        builder.build().unwrap_err(),
        NetworkError::RootWithoutPressure { node: "ROOT".into() }
    );
}

#[test]
fn pure_cycle_has_no_root() {
    let mut builder = NetworkBuilder::new();
    builder.add_branch("A", "B", None).add_branch("B", "A", None);
    assert_eq!(builder.build().unwrap_err(), NetworkError::NoRoot);
}

#[test]
fn cycle_beside_a_root_is_unreachable() {
    let mut builder = NetworkBuilder::new();
    builder
        .add_branch("ROOT", "G1", None)
        .add_branch("A", "B", None)
        .add_branch("B", "A", None)
        .set_terminal_pressure("ROOT", bar(1.0));
    assert!(matches!(
        builder.build().unwrap_err(),
        NetworkError::Unreachable { .. }
    ));
}

#[test]
fn several_roots_are_all_walked() {
    let mut builder = NetworkBuilder::new();
    builder
        .add_branch("R1", "G1", None)
        .add_branch("R2", "G2", None)
        .set_terminal_pressure("R1", bar(10.0))
        .set_terminal_pressure("R2", bar(20.0));
    let net = builder.build().unwrap();
    let order = net.traversal_order();
    assert_eq!(order.root_to_leaf().len(), 4);
    assert_eq!(order.leaves().len(), 2);
}

#[test]
fn deep_chain_does_not_recurse() {
    let mut builder = NetworkBuilder::new();
    builder.set_terminal_pressure("N0", bar(1.0));
    for i in 0..50_000 {
        builder.add_branch(format!("N{}", i), format!("N{}", i + 1), None);
    }
    let net = builder.build().unwrap();
    let order = net.traversal_order();
    assert_eq!(order.root_to_leaf().len(), 50_001);
    assert_eq!(order.root_to_leaf()[0], "N0");
    assert!(order.is_leaf("N50000"));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn random_trees_order_parents_first(parents in prop::collection::vec(any::<prop::sample::Index>(), 1..60)) {
            let mut builder = NetworkBuilder::new();
            builder.set_terminal_pressure("N0", bar(1.0));
            let mut parent_of = vec![0usize];
            for (i, p) in parents.iter().enumerate() {
                let child = i + 1;
                let parent = p.index(child);
                parent_of.push(parent);
                builder.add_branch(format!("N{}", parent), format!("N{}", child), None);
            }
            let net = builder.build().unwrap();
            let order = net.traversal_order();
            prop_assert_eq!(order.root_to_leaf().len(), parent_of.len());

            let pos = |n: usize| order.root_to_leaf().iter().position(|x| *x == format!("N{}", n)).unwrap();
            for child in 1..parent_of.len() {
                prop_assert!(pos(parent_of[child]) < pos(child));
            }
        }
    }
}
