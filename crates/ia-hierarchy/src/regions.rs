//! Region hierarchy: parent regions and their member subregions.

use std::collections::{BTreeMap, BTreeSet};

use ia_store::RecordStore;
use serde::{Deserialize, Serialize};

use crate::{HierarchyError, HierarchyResult};

/// User-supplied mapping from a parent region to its subregions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionMapping {
    parents: BTreeMap<String, BTreeSet<String>>,
}

impl RegionMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(
        &mut self,
        parent: impl Into<String>,
        subregions: impl IntoIterator<Item = S>,
    ) -> HierarchyResult<()> {
        let parent = parent.into();
        let subregions: BTreeSet<String> = subregions.into_iter().map(Into::into).collect();
        if subregions.contains(&parent) {
            return Err(HierarchyError::SelfReference { region: parent });
        }
        self.parents.entry(parent).or_default().extend(subregions);
        Ok(())
    }

    pub fn get(&self, parent: &str) -> Option<Vec<String>> {
        self.parents
            .get(parent)
            .map(|subs| subs.iter().cloned().collect())
    }

    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.parents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Subregions to aggregate into `region`.
///
/// Precedence: an explicit list (verbatim), then the mapping entry for
/// `region`, then every region other than `region` that holds data for one
/// of `variables`.
pub fn subregions_of(
    store: &RecordStore,
    region: &str,
    variables: &[String],
    explicit: Option<&[String]>,
    mapping: Option<&RegionMapping>,
) -> Vec<String> {
    if let Some(explicit) = explicit {
        return explicit.to_vec();
    }
    if let Some(subs) = mapping.and_then(|m| m.get(region)) {
        return subs;
    }
    let regions: BTreeSet<&str> = store
        .keys()
        .filter(|k| k.region != region && variables.iter().any(|v| *v == k.variable))
        .map(|k| k.region.as_str())
        .collect();
    regions.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ia_store::RecordKey;

    fn store() -> RecordStore {
        RecordStore::from_pairs([
            (RecordKey::new("m", "s", "World", "Primary Energy", "EJ/yr", 2005), 12.0),
            (RecordKey::new("m", "s", "reg_a", "Primary Energy", "EJ/yr", 2005), 8.0),
            (RecordKey::new("m", "s", "reg_b", "Primary Energy", "EJ/yr", 2005), 4.0),
            (RecordKey::new("m", "s", "reg_c", "Population", "m", 2005), 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn inferred_from_records_of_variable() {
        let subs = subregions_of(&store(), "World", &["Primary Energy".to_string()], None, None);
        assert_eq!(subs, vec!["reg_a", "reg_b"]);
    }

    #[test]
    fn explicit_wins_over_mapping() {
        let mut mapping = RegionMapping::new();
        mapping.insert("World", ["reg_a"]).unwrap();
        let vars = ["Primary Energy".to_string()];

        let from_map = subregions_of(&store(), "World", &vars, None, Some(&mapping));
        assert_eq!(from_map, vec!["reg_a"]);

        let explicit = ["reg_c".to_string()];
        let subs = subregions_of(&store(), "World", &vars, Some(&explicit), Some(&mapping));
        assert_eq!(subs, vec!["reg_c"]);
    }

    #[test]
    fn mapping_rejects_self_reference() {
        let mut mapping = RegionMapping::new();
        assert!(mapping.insert("World", ["World", "reg_a"]).is_err());
        assert!(mapping.is_empty());
    }
}
