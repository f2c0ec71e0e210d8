//! The record container.

use std::collections::{BTreeMap, BTreeSet};

use ia_core::{Real, TimeDomain, TimePoint, Tolerances, ensure_finite, nearly_equal};

use crate::filter::Filter;
use crate::meta::{MetaTable, ScenarioId};
use crate::record::{Dimension, Record, RecordKey};
use crate::{StoreError, StoreResult};

/// What `merge` does when a key exists on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnConflict {
    /// Reject the whole merge.
    #[default]
    Fail,
    /// Take the incoming value.
    Replace,
}

/// Owned, sorted collection of unique records plus scenario meta.
///
/// Operations that derive a new collection (`filter`, `rename`, ...) return a
/// fresh store; only `insert` and `merge` mutate in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    data: BTreeMap<RecordKey, Real>,
    meta: MetaTable,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records. NaN values are dropped, duplicate keys and
    /// infinite values are rejected.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> StoreResult<Self> {
        Self::from_pairs(records.into_iter().map(|r| (r.key, r.value)))
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (RecordKey, Real)>) -> StoreResult<Self> {
        let mut store = Self::new();
        for (key, value) in pairs {
            store.insert(key, value)?;
        }
        Ok(store)
    }

    /// Insert a single value; the key must be new.
    pub fn insert(&mut self, key: RecordKey, value: Real) -> StoreResult<()> {
        if value.is_nan() {
            return Ok(());
        }
        ensure_finite(value, "record value")?;
        if self.data.contains_key(&key) {
            return Err(StoreError::DuplicateKey {
                key: key.to_string(),
            });
        }
        self.meta.ensure(key.scenario_id());
        self.data.insert(key, value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, key: &RecordKey) -> Option<Real> {
        self.data.get(key).copied()
    }

    pub fn contains_key(&self, key: &RecordKey) -> bool {
        self.data.contains_key(key)
    }

    /// Iterate in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&RecordKey, Real)> {
        self.data.iter().map(|(k, v)| (k, *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &RecordKey> {
        self.data.keys()
    }

    pub fn records(&self) -> Vec<Record> {
        self.iter()
            .map(|(k, v)| Record::new(k.clone(), v))
            .collect()
    }

    pub fn meta(&self) -> &MetaTable {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut MetaTable {
        &mut self.meta
    }

    /// Copy the meta rows of `source` for every scenario present here.
    pub fn inherit_meta(&mut self, source: &MetaTable) {
        let present: BTreeSet<ScenarioId> = self.data.keys().map(RecordKey::scenario_id).collect();
        for (id, meta) in source.iter() {
            if present.contains(id) {
                self.meta.set_exclude(id.clone(), meta.exclude);
            }
        }
    }

    pub fn filter(&self, filter: &Filter) -> Self {
        self.filter_by(|key| filter.matches(key))
    }

    pub fn filter_by(&self, mut predicate: impl FnMut(&RecordKey) -> bool) -> Self {
        let data: BTreeMap<RecordKey, Real> = self
            .data
            .iter()
            .filter(|(k, _)| predicate(k))
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        let present: BTreeSet<ScenarioId> = data.keys().map(RecordKey::scenario_id).collect();
        let mut meta = self.meta.clone();
        meta.retain(|id| present.contains(id));
        Self { data, meta }
    }

    /// Rename values of one dimension. Renaming onto an existing key fails.
    /// With `append`, the original rows are kept next to the renamed ones.
    pub fn rename(
        &self,
        dim: Dimension,
        mapping: &BTreeMap<String, String>,
        append: bool,
    ) -> StoreResult<Self> {
        let mut out = if append { self.clone() } else { Self::new() };
        for (key, value) in &self.data {
            let target = mapping.get(key.dim(dim));
            if append && target.is_none() {
                continue;
            }
            let mut renamed = key.clone();
            if let Some(target) = target {
                renamed.set_dim(dim, target.clone());
            }
            out.insert(renamed, *value)?;
        }

        for (id, meta) in self.meta.iter() {
            let mut renamed = id.clone();
            match dim {
                Dimension::Model => {
                    if let Some(t) = mapping.get(&id.model) {
                        renamed.model = t.clone();
                    }
                }
                Dimension::Scenario => {
                    if let Some(t) = mapping.get(&id.scenario) {
                        renamed.scenario = t.clone();
                    }
                }
                _ => {}
            }
            if out.meta.get(&renamed).is_some() {
                out.meta.set_exclude(renamed, meta.exclude);
            }
        }
        Ok(out)
    }

    /// Merge `other` into this store as a single all-or-nothing step.
    pub fn merge(&mut self, other: RecordStore, on_conflict: OnConflict) -> StoreResult<()> {
        if on_conflict == OnConflict::Fail {
            let conflicts: Vec<&RecordKey> =
                other.data.keys().filter(|k| self.data.contains_key(k)).collect();
            if let Some(first) = conflicts.first() {
                return Err(StoreError::Conflict {
                    count: conflicts.len(),
                    first: first.to_string(),
                });
            }
        }
        self.meta.absorb(&other.meta);
        for (key, value) in other.data {
            self.meta.ensure(key.scenario_id());
            self.data.insert(key, value);
        }
        Ok(())
    }

    pub fn unique(&self, dim: Dimension) -> BTreeSet<String> {
        self.data.keys().map(|k| k.dim(dim).to_string()).collect()
    }

    pub fn variables(&self) -> BTreeSet<&str> {
        self.data.keys().map(|k| k.variable.as_str()).collect()
    }

    pub fn regions(&self) -> BTreeSet<&str> {
        self.data.keys().map(|k| k.region.as_str()).collect()
    }

    pub fn scenarios(&self) -> BTreeSet<ScenarioId> {
        self.data.keys().map(RecordKey::scenario_id).collect()
    }

    /// Distinct values of an extra column, ignoring rows without it.
    pub fn extra_values(&self, column: &str) -> BTreeSet<&str> {
        self.data
            .keys()
            .filter_map(|k| k.extra.get(column).map(String::as_str))
            .collect()
    }

    pub fn time_points(&self) -> BTreeSet<TimePoint> {
        self.data.keys().map(|k| k.time).collect()
    }

    pub fn time_domain(&self) -> TimeDomain {
        TimeDomain::from_points(self.data.keys().map(|k| &k.time))
    }

    /// Replace datetime time points by their calendar year.
    pub fn swap_time_for_year(&self) -> StoreResult<Self> {
        if self.time_domain() != TimeDomain::Datetime {
            return Err(StoreError::NotDatetime);
        }
        let mut out = Self {
            data: BTreeMap::new(),
            meta: self.meta.clone(),
        };
        for (key, value) in &self.data {
            let mut swapped = key.clone();
            swapped.time = TimePoint::Year(key.time.year());
            if out.data.insert(swapped.clone(), *value).is_some() {
                return Err(StoreError::SwapDuplicate {
                    key: swapped.to_string(),
                });
            }
        }
        Ok(out)
    }

    /// Same keys and values within tolerance; meta is not compared.
    pub fn approx_eq(&self, other: &Self, tol: Tolerances) -> bool {
        self.data.len() == other.data.len()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && nearly_equal(*va, *vb, tol))
    }
}

impl FromIterator<(RecordKey, Real)> for RecordStore {
    /// Later duplicates overwrite earlier ones; NaN values are skipped.
    fn from_iter<T: IntoIterator<Item = (RecordKey, Real)>>(iter: T) -> Self {
        let mut store = Self::new();
        for (key, value) in iter {
            if value.is_nan() {
                continue;
            }
            store.meta.ensure(key.scenario_id());
            store.data.insert(key, value);
        }
        store
    }
}
