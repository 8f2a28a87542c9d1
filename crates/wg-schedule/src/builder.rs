//! Incremental builder for a report step.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;
use wg_network::ExtNetwork;

use crate::controls::{InjectionDeclaration, ProductionDeclaration};
use crate::error::{ScheduleError, ScheduleResult};
use crate::events::GroupEvent;
use crate::gas::{GasConsumptionDeclaration, GasSalesDeclaration};
use crate::group::{FIELD, Group};
use crate::step::ScheduleStep;
use crate::validate;
use crate::well::Well;

/// Builder for one [`ScheduleStep`].
///
/// FIELD exists from the start. Groups and wells are attached to their
/// parents in declaration order when `build()` runs; errors found while
/// adding are reported by `build()`.
#[derive(Debug)]
pub struct ScheduleStepBuilder {
    groups: Vec<Group>,
    group_index: HashMap<String, usize>,
    wells: Vec<Well>,
    gas_consumption: BTreeMap<String, GasConsumptionDeclaration>,
    gas_sales: BTreeMap<String, GasSalesDeclaration>,
    events: BTreeSet<(String, GroupEvent)>,
    network: ExtNetwork,
    pending: Vec<ScheduleError>,
}

impl Default for ScheduleStepBuilder {
    fn default() -> Self {
        let mut group_index = HashMap::new();
        group_index.insert(FIELD.to_string(), 0);
        Self {
            groups: vec![Group::new(FIELD, None)],
            group_index,
            wells: Vec::new(),
            gas_consumption: BTreeMap::new(),
            gas_sales: BTreeMap::new(),
            events: BTreeSet::new(),
            network: ExtNetwork::inactive(),
            pending: Vec::new(),
        }
    }
}

impl ScheduleStepBuilder {
    /// Create a builder holding only FIELD.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group below `parent`.
    pub fn add_group(&mut self, name: impl Into<String>, parent: impl Into<String>) -> &mut Self {
        let name = name.into();
        if name == FIELD {
            self.pending.push(ScheduleError::FieldHasParent);
            return self;
        }
        if self.group_index.contains_key(&name) {
            self.pending.push(ScheduleError::DuplicateName { name });
            return self;
        }
        self.group_index.insert(name.clone(), self.groups.len());
        self.groups.push(Group::new(name, Some(parent.into())));
        self
    }

    pub fn set_efficiency_factor(&mut self, group: &str, factor: f64) -> &mut Self {
        if let Some(g) = self.group_mut(group) {
            g.efficiency_factor = factor;
        }
        self
    }

    /// Declare production controls; raises the production update event.
    pub fn set_production(&mut self, group: &str, decl: ProductionDeclaration) -> &mut Self {
        if let Some(g) = self.group_mut(group) {
            g.production = Some(decl);
            self.events
                .insert((group.to_string(), GroupEvent::ProductionUpdate));
        }
        self
    }

    /// Declare injection controls for the declaration's phase; raises the injection update event.
    pub fn set_injection(&mut self, group: &str, decl: InjectionDeclaration) -> &mut Self {
        if let Some(g) = self.group_mut(group) {
            g.injection.insert(decl.phase, decl);
            self.events
                .insert((group.to_string(), GroupEvent::InjectionUpdate));
        }
        self
    }

    pub fn add_well(&mut self, well: Well) -> &mut Self {
        self.wells.push(well);
        self
    }

    pub fn set_gas_consumption(&mut self, group: &str, decl: GasConsumptionDeclaration) -> &mut Self {
        if self.require_group(group) {
            self.gas_consumption.insert(group.to_string(), decl);
        }
        self
    }

    pub fn set_gas_sales(&mut self, group: &str, decl: GasSalesDeclaration) -> &mut Self {
        if self.require_group(group) {
            self.gas_sales.insert(group.to_string(), decl);
        }
        self
    }

    /// Drop a previously raised event (a declaration carried over unchanged).
    pub fn clear_event(&mut self, group: &str, event: GroupEvent) -> &mut Self {
        self.events.remove(&(group.to_string(), event));
        self
    }

    pub fn set_network(&mut self, network: ExtNetwork) -> &mut Self {
        self.network = network;
        self
    }

    /// Validate and freeze the step.
    pub fn build(mut self) -> ScheduleResult<ScheduleStep> {
        if let Some(err) = self.pending.drain(..).next() {
            return Err(err);
        }

        validate::validate_tree(&self.groups, &self.wells)?;
        validate::validate_network(&self.network, &self.group_index)?;

        // Attach children in declaration order.
        let mut groups = std::mem::take(&mut self.groups);
        for i in 0..groups.len() {
            if let Some(parent) = groups[i].parent.clone() {
                let child = groups[i].name.clone();
                let p = self.group_index[&parent];
                groups[p].groups.push(child);
            }
        }
        for well in &self.wells {
            let g = self.group_index[&well.group];
            groups[g].wells.push(well.name.clone());
        }

        debug!(
            groups = groups.len(),
            wells = self.wells.len(),
            "schedule step built"
        );

        Ok(ScheduleStep {
            groups: groups.into_iter().map(|g| (g.name.clone(), g)).collect(),
            wells: self.wells.into_iter().map(|w| (w.name.clone(), w)).collect(),
            gas_consumption: self.gas_consumption,
            gas_sales: self.gas_sales,
            events: self.events,
            network: self.network,
        })
    }

    fn group_mut(&mut self, name: &str) -> Option<&mut Group> {
        match self.group_index.get(name) {
            Some(&i) => Some(&mut self.groups[i]),
            None => {
                self.pending.push(ScheduleError::UnknownGroup {
                    name: name.to_string(),
                });
                None
            }
        }
    }

    fn require_group(&mut self, name: &str) -> bool {
        self.group_mut(name).is_some()
    }
}
