//! YAML deck format.
//!
//! A deck is a list of report steps, each a complete snapshot of the group
//! tree, wells, group declarations and network for that step.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wg_core::bar;
use wg_network::NetworkBuilder;

use crate::builder::ScheduleStepBuilder;
use crate::controls::{InjectionDeclaration, ProductionDeclaration};
use crate::error::{ScheduleError, ScheduleResult};
use crate::gas::{GasConsumptionDeclaration, GasSalesDeclaration};
use crate::group::FIELD;
use crate::step::{Schedule, ScheduleStep};
use crate::summary::UdaValue;
use crate::well::Well;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckDef {
    #[serde(default)]
    pub steps: Vec<StepDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepDef {
    #[serde(default)]
    pub groups: Vec<GroupDef>,
    #[serde(default)]
    pub wells: Vec<Well>,
    #[serde(default)]
    pub gas_consumption: Vec<GasConsumptionDef>,
    #[serde(default)]
    pub gas_sales: Vec<GasSalesDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkDef>,
}

fn unit_factor() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDef {
    pub name: String,
    /// Parent group; FIELD when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default = "unit_factor")]
    pub efficiency_factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production: Option<ProductionDeclaration>,
    #[serde(default)]
    pub injection: Vec<InjectionDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasConsumptionDef {
    pub group: String,
    #[serde(default)]
    pub consumption_rate: UdaValue,
    #[serde(default)]
    pub import_rate: UdaValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasSalesDef {
    pub group: String,
    pub sales_target: UdaValue,
    #[serde(default)]
    pub max_sales_rate: UdaValue,
    #[serde(default)]
    pub min_sales_rate: UdaValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDef {
    #[serde(default)]
    pub nodes: Vec<NetworkNodeDef>,
    #[serde(default)]
    pub branches: Vec<BranchDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNodeDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_pressure_bar: Option<f64>,
    #[serde(default)]
    pub add_gas_lift_gas: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchDef {
    pub uptree: String,
    pub downtree: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vfp_table: Option<u32>,
}

impl StepDef {
    /// Build and validate the report step.
    pub fn build(&self) -> ScheduleResult<ScheduleStep> {
        let mut builder = ScheduleStepBuilder::new();

        for group in self.groups.iter().filter(|g| g.name != FIELD) {
            let parent = group.parent.as_deref().unwrap_or(FIELD);
            builder.add_group(group.name.clone(), parent);
        }

        for group in &self.groups {
            if group.name == FIELD && group.parent.is_some() {
                return Err(ScheduleError::FieldHasParent);
            }
            builder.set_efficiency_factor(&group.name, group.efficiency_factor);
            if let Some(production) = &group.production {
                builder.set_production(&group.name, production.clone());
            }
            for injection in &group.injection {
                builder.set_injection(&group.name, injection.clone());
            }
        }

        for well in &self.wells {
            builder.add_well(well.clone());
        }

        for def in &self.gas_consumption {
            builder.set_gas_consumption(
                &def.group,
                GasConsumptionDeclaration {
                    consumption_rate: def.consumption_rate.clone(),
                    import_rate: def.import_rate.clone(),
                },
            );
        }

        for def in &self.gas_sales {
            builder.set_gas_sales(
                &def.group,
                GasSalesDeclaration {
                    sales_target: def.sales_target.clone(),
                    max_sales_rate: def.max_sales_rate.clone(),
                    min_sales_rate: def.min_sales_rate.clone(),
                },
            );
        }

        if let Some(network) = &self.network {
            builder.set_network(network.build()?);
        }

        builder.build()
    }
}

impl NetworkDef {
    pub fn build(&self) -> ScheduleResult<wg_network::ExtNetwork> {
        let mut builder = NetworkBuilder::new();
        for node in &self.nodes {
            builder.add_node(node.name.clone());
            if let Some(p) = node.terminal_pressure_bar {
                builder.set_terminal_pressure(node.name.clone(), bar(p));
            }
            builder.set_add_gas_lift_gas(node.name.clone(), node.add_gas_lift_gas);
        }
        for branch in &self.branches {
            builder.add_branch(branch.uptree.clone(), branch.downtree.clone(), branch.vfp_table);
        }
        Ok(builder.build()?)
    }
}

impl DeckDef {
    pub fn into_schedule(&self) -> ScheduleResult<Schedule> {
        let steps = self
            .steps
            .iter()
            .map(StepDef::build)
            .collect::<ScheduleResult<Vec<_>>>()?;
        Ok(Schedule::new(steps))
    }
}

pub fn from_yaml_str(content: &str) -> ScheduleResult<Schedule> {
    let deck: DeckDef = serde_yaml::from_str(content)?;
    deck.into_schedule()
}

pub fn load_yaml(path: &Path) -> ScheduleResult<Schedule> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn read_deck(path: &Path) -> ScheduleResult<DeckDef> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

pub fn save_yaml(path: &Path, deck: &DeckDef) -> ScheduleResult<()> {
    let content = serde_yaml::to_string(deck)?;
    std::fs::write(path, content)?;
    Ok(())
}
