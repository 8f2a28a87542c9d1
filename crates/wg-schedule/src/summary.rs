//! Summary-state lookups for targets given as user quantities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// Current values of summary symbols (for example user-defined quantities).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryState {
    values: BTreeMap<String, f64>,
}

impl SummaryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, symbol: impl Into<String>, value: f64) {
        self.values.insert(symbol.into(), value);
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.values.get(symbol).copied()
    }

    pub fn has(&self, symbol: &str) -> bool {
        self.values.contains_key(symbol)
    }
}

/// A declared quantity: either a literal number or a summary symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UdaValue {
    Numeric(f64),
    Symbol(String),
}

impl UdaValue {
    /// Evaluate against the summary state.
    pub fn resolve(&self, summary: &SummaryState) -> ScheduleResult<f64> {
        match self {
            UdaValue::Numeric(v) => Ok(*v),
            UdaValue::Symbol(symbol) => {
                summary
                    .get(symbol)
                    .ok_or_else(|| ScheduleError::UnknownSymbol {
                        symbol: symbol.clone(),
                    })
            }
        }
    }
}

impl Default for UdaValue {
    fn default() -> Self {
        UdaValue::Numeric(0.0)
    }
}

impl From<f64> for UdaValue {
    fn from(v: f64) -> Self {
        UdaValue::Numeric(v)
    }
}

impl From<&str> for UdaValue {
    fn from(symbol: &str) -> Self {
        UdaValue::Symbol(symbol.to_string())
    }
}
