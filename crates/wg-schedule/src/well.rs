//! Well declarations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WellRole {
    Producer,
    Injector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WellStatus {
    #[default]
    Open,
    Shut,
}

fn unit_factor() -> f64 {
    1.0
}

/// A well as declared for one report step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Well {
    pub name: String,
    /// Name of the group the well belongs to.
    pub group: String,
    pub role: WellRole,
    #[serde(default)]
    pub status: WellStatus,
    #[serde(default = "unit_factor")]
    pub efficiency_factor: f64,
}

impl Well {
    pub fn new(name: impl Into<String>, group: impl Into<String>, role: WellRole) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            role,
            status: WellStatus::Open,
            efficiency_factor: 1.0,
        }
    }

    pub fn with_efficiency_factor(mut self, factor: f64) -> Self {
        self.efficiency_factor = factor;
        self
    }

    pub fn with_status(mut self, status: WellStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_producer(&self) -> bool {
        self.role == WellRole::Producer
    }

    pub fn is_injector(&self) -> bool {
        self.role == WellRole::Injector
    }

    pub fn is_shut(&self) -> bool {
        self.status == WellStatus::Shut
    }
}
