//! Record and key types.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

use ia_core::{Real, TimePoint};
use serde::{Deserialize, Serialize};

use crate::StoreError;
use crate::meta::ScenarioId;

/// Composite key of a timeseries record.
///
/// Field order defines the sort order of every store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub model: String,
    pub scenario: String,
    pub region: String,
    pub variable: String,
    pub unit: String,
    /// Extra index columns such as `subannual`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
    pub time: TimePoint,
}

impl RecordKey {
    pub fn new(
        model: impl Into<String>,
        scenario: impl Into<String>,
        region: impl Into<String>,
        variable: impl Into<String>,
        unit: impl Into<String>,
        time: impl Into<TimePoint>,
    ) -> Self {
        Self {
            model: model.into(),
            scenario: scenario.into(),
            region: region.into(),
            variable: variable.into(),
            unit: unit.into(),
            extra: BTreeMap::new(),
            time: time.into(),
        }
    }

    pub fn with_extra(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(column.into(), value.into());
        self
    }

    pub fn dim(&self, dim: Dimension) -> &str {
        match dim {
            Dimension::Model => &self.model,
            Dimension::Scenario => &self.scenario,
            Dimension::Region => &self.region,
            Dimension::Variable => &self.variable,
            Dimension::Unit => &self.unit,
        }
    }

    pub fn set_dim(&mut self, dim: Dimension, value: String) {
        match dim {
            Dimension::Model => self.model = value,
            Dimension::Scenario => self.scenario = value,
            Dimension::Region => self.region = value,
            Dimension::Variable => self.variable = value,
            Dimension::Unit => self.unit = value,
        }
    }

    pub fn scenario_id(&self) -> ScenarioId {
        ScenarioId::new(&self.model, &self.scenario)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} / {} [{}]",
            self.model, self.scenario, self.region, self.variable, self.unit
        )?;
        for (column, value) in &self.extra {
            write!(f, " {column}={value}")?;
        }
        write!(f, " @ {}", self.time)
    }
}

/// A key with its value, the unit of exchange with files and callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(flatten)]
    pub key: RecordKey,
    pub value: Real,
}

impl Record {
    pub fn new(key: RecordKey, value: Real) -> Self {
        Self { key, value }
    }
}

/// String-valued index dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Model,
    Scenario,
    Region,
    Variable,
    Unit,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Model,
        Dimension::Scenario,
        Dimension::Region,
        Dimension::Variable,
        Dimension::Unit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Model => "model",
            Dimension::Scenario => "scenario",
            Dimension::Region => "region",
            Dimension::Variable => "variable",
            Dimension::Unit => "unit",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| StoreError::UnknownDimension {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_sort_by_field_order() {
        let a = RecordKey::new("m", "s", "World", "Primary Energy", "EJ/yr", 2010);
        let b = RecordKey::new("m", "s", "reg_a", "Primary Energy", "EJ/yr", 2005);
        // uppercase sorts before lowercase, region before time
        assert!(a < b);
    }

    #[test]
    fn dimension_accessors() {
        let mut key = RecordKey::new("m", "s", "World", "Primary Energy", "EJ/yr", 2005);
        key.set_dim(Dimension::Region, "reg_a".to_string());
        assert_eq!(key.dim(Dimension::Region), "reg_a");
        assert_eq!("variable".parse::<Dimension>().unwrap(), Dimension::Variable);
        assert!("year".parse::<Dimension>().is_err());
    }

    #[test]
    fn record_json_is_flat() {
        let record = Record::new(
            RecordKey::new("m", "s", "World", "Primary Energy", "EJ/yr", 2005),
            12.0,
        );
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"time\":2005"));
        assert!(!json.contains("extra"));
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn record_json_with_extra_column() {
        let json = r#"{"model":"m","scenario":"s","region":"World","variable":"PE","unit":"EJ/yr","extra":{"subannual":"summer"},"time":2005,"value":1.5}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.key.extra.get("subannual").map(String::as_str), Some("summer"));
    }
}
