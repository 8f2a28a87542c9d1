//! Group events raised at a report step.

use serde::{Deserialize, Serialize};

/// A change to a group's declared controls at this report step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupEvent {
    ProductionUpdate,
    InjectionUpdate,
}
