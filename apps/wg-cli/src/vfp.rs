//! Linear stand-in for production VFP tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wg_control::{ControlError, ControlResult, VfpProduction};
use wg_core::{Pressure, bar};

use crate::error::{CliError, CliResult};

/// Pressure drop linear in the produced rates, in bar per unit rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearVfpTable {
    pub id: u32,
    #[serde(default)]
    pub water: f64,
    #[serde(default)]
    pub oil: f64,
    #[serde(default)]
    pub gas: f64,
    #[serde(default)]
    pub alq: f64,
}

#[derive(Debug, Clone, Default)]
pub struct LinearVfp {
    tables: BTreeMap<u32, LinearVfpTable>,
}

impl LinearVfp {
    pub fn new(tables: Vec<LinearVfpTable>) -> CliResult<Self> {
        let mut map = BTreeMap::new();
        for table in tables {
            let id = table.id;
            if map.insert(id, table).is_some() {
                return Err(CliError::DuplicateVfpTable(id));
            }
        }
        Ok(Self { tables: map })
    }
}

impl VfpProduction for LinearVfp {
    fn bhp(
        &self,
        table: u32,
        water: f64,
        oil: f64,
        gas: f64,
        thp: Pressure,
        alq: f64,
    ) -> ControlResult<Pressure> {
        let t = self.tables.get(&table).ok_or_else(|| ControlError::Vfp {
            table,
            what: "table is not defined in the case".to_string(),
        })?;
        // Production is negative.
        let drop = -(t.water * water + t.oil * oil + t.gas * gas) + t.alq * alq;
        Ok(thp + bar(drop))
    }
}
