//! wg-network: extended production network layer.
//!
//! Provides:
//! - Network data structures (nodes, branches)
//! - Incremental network builder with validation
//! - Parent-before-child traversal order for the pressure solver
//!
//! # Example
//!
//! ```
//! use wg_core::bar;
//! use wg_network::NetworkBuilder;
//!
//! let mut builder = NetworkBuilder::new();
//! builder.add_branch("PLAT", "G1", Some(3));
//! builder.set_terminal_pressure("PLAT", bar(50.0));
//! let network = builder.build().unwrap();
//!
//! assert_eq!(network.nodes().len(), 2);
//! assert_eq!(network.uptree_branch("G1").unwrap().uptree_node(), "PLAT");
//! ```

pub mod builder;
pub mod error;
pub mod network;
pub mod traversal;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::NetworkBuilder;
pub use error::{NetworkError, NetworkResult};
pub use network::{Branch, ExtNetwork, NO_PRESSURE_LOSS_TABLE, NetworkNode};
pub use traversal::TraversalOrder;
