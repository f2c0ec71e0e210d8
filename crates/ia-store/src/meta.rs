//! Per-scenario meta side-table.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A (model, scenario) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScenarioId {
    pub model: String,
    pub scenario: String,
}

impl ScenarioId {
    pub fn new(model: impl Into<String>, scenario: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            scenario: scenario.into(),
        }
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.model, self.scenario)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioMeta {
    pub exclude: bool,
}

/// Meta indicators keyed by scenario, sorted by (model, scenario).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTable {
    rows: BTreeMap<ScenarioId, ScenarioMeta>,
}

impl MetaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a default row for `id` unless one exists.
    pub fn ensure(&mut self, id: ScenarioId) {
        self.rows.entry(id).or_default();
    }

    pub fn get(&self, id: &ScenarioId) -> Option<&ScenarioMeta> {
        self.rows.get(id)
    }

    pub fn is_excluded(&self, id: &ScenarioId) -> bool {
        self.rows.get(id).is_some_and(|m| m.exclude)
    }

    pub fn set_exclude(&mut self, id: ScenarioId, exclude: bool) {
        self.rows.entry(id).or_default().exclude = exclude;
    }

    /// Exclude flags in scenario order.
    pub fn exclude_flags(&self) -> Vec<bool> {
        self.rows.values().map(|m| m.exclude).collect()
    }

    pub fn excluded(&self) -> Vec<&ScenarioId> {
        self.rows
            .iter()
            .filter(|(_, m)| m.exclude)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ScenarioId, &ScenarioMeta)> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&ScenarioId) -> bool) {
        self.rows.retain(|id, _| keep(id));
    }

    /// Take rows from `other` that are not present here.
    pub fn absorb(&mut self, other: &MetaTable) {
        for (id, meta) in &other.rows {
            self.rows.entry(id.clone()).or_insert_with(|| meta.clone());
        }
    }
}
