//! Gas consumption/import and gas sales declarations.

use serde::{Deserialize, Serialize};

use crate::error::ScheduleResult;
use crate::summary::{SummaryState, UdaValue};

/// Gas consumed and imported at a group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GasConsumptionDeclaration {
    #[serde(default)]
    pub consumption_rate: UdaValue,
    #[serde(default)]
    pub import_rate: UdaValue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasConsumption {
    pub consumption_rate: f64,
    pub import_rate: f64,
}

impl GasConsumptionDeclaration {
    pub fn resolve(&self, summary: &SummaryState) -> ScheduleResult<GasConsumption> {
        Ok(GasConsumption {
            consumption_rate: self.consumption_rate.resolve(summary)?,
            import_rate: self.import_rate.resolve(summary)?,
        })
    }
}

/// Gas sales target at a group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GasSalesDeclaration {
    pub sales_target: UdaValue,
    #[serde(default)]
    pub max_sales_rate: UdaValue,
    #[serde(default)]
    pub min_sales_rate: UdaValue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasSales {
    pub sales_target: f64,
    pub max_sales_rate: f64,
    pub min_sales_rate: f64,
}

impl GasSalesDeclaration {
    pub fn resolve(&self, summary: &SummaryState) -> ScheduleResult<GasSales> {
        Ok(GasSales {
            sales_target: self.sales_target.resolve(summary)?,
            max_sales_rate: self.max_sales_rate.resolve(summary)?,
            min_sales_rate: self.min_sales_rate.resolve(summary)?,
        })
    }
}
