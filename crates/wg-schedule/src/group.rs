//! Groups of the control tree.

use std::collections::BTreeMap;

use wg_core::Phase;

use crate::controls::{InjectionControls, InjectionDeclaration, ProductionControls, ProductionDeclaration};
use crate::error::{ScheduleError, ScheduleResult};
use crate::summary::SummaryState;

/// Name of the root group.
pub const FIELD: &str = "FIELD";

/// A node of the group tree for one report step.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub(crate) name: String,
    pub(crate) parent: Option<String>,
    pub(crate) groups: Vec<String>,
    pub(crate) wells: Vec<String>,
    pub(crate) efficiency_factor: f64,
    pub(crate) production: Option<ProductionDeclaration>,
    pub(crate) injection: BTreeMap<Phase, InjectionDeclaration>,
}

impl Group {
    pub(crate) fn new(name: impl Into<String>, parent: Option<String>) -> Self {
        Self {
            name: name.into(),
            parent,
            groups: Vec::new(),
            wells: Vec::new(),
            efficiency_factor: 1.0,
            production: None,
            injection: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent group; `None` only for FIELD.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Child groups in declaration order.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Wells directly in this group, in declaration order.
    pub fn wells(&self) -> &[String] {
        &self.wells
    }

    pub fn efficiency_factor(&self) -> f64 {
        self.efficiency_factor
    }

    pub fn is_field(&self) -> bool {
        self.name == FIELD
    }

    pub fn is_production_group(&self) -> bool {
        self.production.is_some()
    }

    pub fn is_injection_group(&self) -> bool {
        !self.injection.is_empty()
    }

    pub fn has_injection_control(&self, phase: Phase) -> bool {
        self.injection.contains_key(&phase)
    }

    pub fn production_declaration(&self) -> Option<&ProductionDeclaration> {
        self.production.as_ref()
    }

    pub fn injection_declaration(&self, phase: Phase) -> Option<&InjectionDeclaration> {
        self.injection.get(&phase)
    }

    pub fn production_controls(&self, summary: &SummaryState) -> ScheduleResult<ProductionControls> {
        self.production
            .as_ref()
            .ok_or_else(|| ScheduleError::NotProductionGroup {
                group: self.name.clone(),
            })?
            .resolve(summary)
    }

    pub fn injection_controls(
        &self,
        phase: Phase,
        summary: &SummaryState,
    ) -> ScheduleResult<InjectionControls> {
        self.injection
            .get(&phase)
            .ok_or_else(|| ScheduleError::NoInjectionControl {
                group: self.name.clone(),
                phase,
            })?
            .resolve(&self.name, summary)
    }

    /// Whether the group may take a share of its parent's production target.
    pub fn production_group_control_available(&self) -> bool {
        if self.is_field() {
            return false;
        }
        self.production
            .as_ref()
            .is_none_or(|p| p.available_for_group_control)
    }

    /// Whether the group may take a share of its parent's injection target.
    pub fn injection_group_control_available(&self, phase: Phase) -> bool {
        if self.is_field() {
            return false;
        }
        self.injection
            .get(&phase)
            .is_none_or(|i| i.available_for_group_control)
    }
}
