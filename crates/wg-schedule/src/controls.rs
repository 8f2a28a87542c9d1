//! Group control modes and their declarations.
//!
//! Declarations hold [`UdaValue`]s as given in the deck; resolving them
//! against a [`SummaryState`] yields the numeric controls used by the core.

use serde::{Deserialize, Serialize};
use wg_core::Phase;

use crate::error::ScheduleResult;
use crate::summary::{SummaryState, UdaValue};

/// Production control mode of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductionCMode {
    #[default]
    None,
    Orat,
    Wrat,
    Grat,
    Lrat,
    Crat,
    Resv,
    Prbl,
    Fld,
}

impl ProductionCMode {
    /// NONE and FLD defer to the parent group.
    pub fn is_transparent(self) -> bool {
        matches!(self, ProductionCMode::None | ProductionCMode::Fld)
    }
}

/// Injection control mode of a group for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InjectionCMode {
    #[default]
    None,
    Rate,
    Resv,
    Rein,
    Vrep,
    Sale,
    Fld,
}

impl InjectionCMode {
    /// NONE and FLD defer to the parent group.
    pub fn is_transparent(self) -> bool {
        matches!(self, InjectionCMode::None | InjectionCMode::Fld)
    }
}

/// What an injection group's guide rate is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GuideRateInjTarget {
    Rate,
    Void,
    Netv,
    Resv,
    Potn,
    #[default]
    #[serde(rename = "NONE")]
    NoGuideRate,
}

fn available() -> bool {
    true
}

/// Production controls as declared for a group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductionDeclaration {
    pub cmode: ProductionCMode,
    #[serde(default)]
    pub oil_target: UdaValue,
    #[serde(default)]
    pub water_target: UdaValue,
    #[serde(default)]
    pub gas_target: UdaValue,
    #[serde(default)]
    pub liquid_target: UdaValue,
    #[serde(default)]
    pub resv_target: UdaValue,
    #[serde(default = "available")]
    pub available_for_group_control: bool,
}

/// Resolved production controls.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionControls {
    pub cmode: ProductionCMode,
    pub oil_target: f64,
    pub water_target: f64,
    pub gas_target: f64,
    pub liquid_target: f64,
    pub resv_target: f64,
}

impl ProductionDeclaration {
    pub fn new(cmode: ProductionCMode) -> Self {
        Self {
            cmode,
            available_for_group_control: true,
            ..Self::default()
        }
    }

    pub fn resolve(&self, summary: &SummaryState) -> ScheduleResult<ProductionControls> {
        Ok(ProductionControls {
            cmode: self.cmode,
            oil_target: self.oil_target.resolve(summary)?,
            water_target: self.water_target.resolve(summary)?,
            gas_target: self.gas_target.resolve(summary)?,
            liquid_target: self.liquid_target.resolve(summary)?,
            resv_target: self.resv_target.resolve(summary)?,
        })
    }
}

/// Injection controls as declared for a group and phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectionDeclaration {
    pub phase: Phase,
    pub cmode: InjectionCMode,
    #[serde(default)]
    pub surface_max_rate: UdaValue,
    #[serde(default)]
    pub resv_max_rate: UdaValue,
    #[serde(default)]
    pub target_reinj_fraction: UdaValue,
    #[serde(default)]
    pub target_void_fraction: UdaValue,
    /// Group whose production is re-injected; the declaring group if unset.
    #[serde(default)]
    pub reinj_group: Option<String>,
    /// Group whose voidage is replaced; the declaring group if unset.
    #[serde(default)]
    pub voidage_group: Option<String>,
    #[serde(default)]
    pub guide_rate_def: GuideRateInjTarget,
    #[serde(default)]
    pub guide_rate: f64,
    #[serde(default = "available")]
    pub available_for_group_control: bool,
}

/// Resolved injection controls.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectionControls {
    pub phase: Phase,
    pub cmode: InjectionCMode,
    pub surface_max_rate: f64,
    pub resv_max_rate: f64,
    pub target_reinj_fraction: f64,
    pub target_void_fraction: f64,
    pub reinj_group: String,
    pub voidage_group: String,
    pub guide_rate_def: GuideRateInjTarget,
    pub guide_rate: f64,
}

impl InjectionDeclaration {
    pub fn new(phase: Phase, cmode: InjectionCMode) -> Self {
        Self {
            phase,
            cmode,
            surface_max_rate: UdaValue::default(),
            resv_max_rate: UdaValue::default(),
            target_reinj_fraction: UdaValue::default(),
            target_void_fraction: UdaValue::default(),
            reinj_group: None,
            voidage_group: None,
            guide_rate_def: GuideRateInjTarget::NoGuideRate,
            guide_rate: 0.0,
            available_for_group_control: true,
        }
    }

    pub fn resolve(&self, group: &str, summary: &SummaryState) -> ScheduleResult<InjectionControls> {
        Ok(InjectionControls {
            phase: self.phase,
            cmode: self.cmode,
            surface_max_rate: self.surface_max_rate.resolve(summary)?,
            resv_max_rate: self.resv_max_rate.resolve(summary)?,
            target_reinj_fraction: self.target_reinj_fraction.resolve(summary)?,
            target_void_fraction: self.target_void_fraction.resolve(summary)?,
            reinj_group: self.reinj_group.clone().unwrap_or_else(|| group.to_string()),
            voidage_group: self.voidage_group.clone().unwrap_or_else(|| group.to_string()),
            guide_rate_def: self.guide_rate_def,
            guide_rate: self.guide_rate,
        })
    }
}
