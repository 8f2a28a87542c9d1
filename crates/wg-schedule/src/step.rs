//! Validated schedule data for one report step, and the step sequence.

use std::collections::{BTreeMap, BTreeSet};

use wg_network::ExtNetwork;

use crate::error::{ScheduleError, ScheduleResult};
use crate::events::GroupEvent;
use crate::gas::{GasConsumption, GasConsumptionDeclaration, GasSales, GasSalesDeclaration};
use crate::group::{FIELD, Group};
use crate::summary::SummaryState;
use crate::well::Well;

/// The group tree, wells and group-level declarations of one report step.
///
/// Built only through [`crate::ScheduleStepBuilder`], so the group tree is
/// known to be acyclic and rooted at FIELD.
#[derive(Debug, Clone)]
pub struct ScheduleStep {
    pub(crate) groups: BTreeMap<String, Group>,
    pub(crate) wells: BTreeMap<String, Well>,
    pub(crate) gas_consumption: BTreeMap<String, GasConsumptionDeclaration>,
    pub(crate) gas_sales: BTreeMap<String, GasSalesDeclaration>,
    pub(crate) events: BTreeSet<(String, GroupEvent)>,
    pub(crate) network: ExtNetwork,
}

impl ScheduleStep {
    pub fn field(&self) -> ScheduleResult<&Group> {
        self.group(FIELD)
    }

    pub fn group(&self, name: &str) -> ScheduleResult<&Group> {
        self.groups
            .get(name)
            .ok_or_else(|| ScheduleError::UnknownGroup {
                name: name.to_string(),
            })
    }

    pub fn well(&self, name: &str) -> ScheduleResult<&Well> {
        self.wells
            .get(name)
            .ok_or_else(|| ScheduleError::UnknownWell {
                name: name.to_string(),
            })
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub fn has_well(&self, name: &str) -> bool {
        self.wells.contains_key(name)
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> + '_ {
        self.groups.values()
    }

    pub fn wells(&self) -> impl Iterator<Item = &Well> + '_ {
        self.wells.values()
    }

    /// Parent of a well or group; `None` for FIELD.
    pub fn parent_of(&self, name: &str) -> ScheduleResult<Option<&str>> {
        if let Some(well) = self.wells.get(name) {
            return Ok(Some(&well.group));
        }
        Ok(self.group(name)?.parent())
    }

    pub fn has_gas_consumption(&self, group: &str) -> bool {
        self.gas_consumption.contains_key(group)
    }

    pub fn gas_consumption(
        &self,
        group: &str,
        summary: &SummaryState,
    ) -> ScheduleResult<Option<GasConsumption>> {
        self.gas_consumption
            .get(group)
            .map(|decl| decl.resolve(summary))
            .transpose()
    }

    pub fn has_gas_sales(&self, group: &str) -> bool {
        self.gas_sales.contains_key(group)
    }

    pub fn gas_sales(&self, group: &str, summary: &SummaryState) -> ScheduleResult<Option<GasSales>> {
        self.gas_sales
            .get(group)
            .map(|decl| decl.resolve(summary))
            .transpose()
    }

    pub fn has_event(&self, group: &str, event: GroupEvent) -> bool {
        self.events.contains(&(group.to_string(), event))
    }

    pub fn network(&self) -> &ExtNetwork {
        &self.network
    }
}

/// Report steps in order.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    steps: Vec<ScheduleStep>,
}

impl Schedule {
    pub fn new(steps: Vec<ScheduleStep>) -> Self {
        Self { steps }
    }

    pub fn push(&mut self, step: ScheduleStep) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, report_step: usize) -> ScheduleResult<&ScheduleStep> {
        self.steps
            .get(report_step)
            .ok_or(ScheduleError::UnknownReportStep {
                step: report_step,
                len: self.steps.len(),
            })
    }
}
