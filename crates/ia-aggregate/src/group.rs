//! Grouping and reduction shared by all aggregation paths.

use std::collections::BTreeMap;

use ia_core::Real;
use ia_store::{RecordKey, RecordStore};

use crate::{AggResult, Method};

/// Member values per output key, in store order.
pub(crate) type Groups = BTreeMap<RecordKey, Vec<Real>>;

/// Group the records of `store` under the key returned by `relabel`;
/// records mapped to `None` are skipped.
pub(crate) fn group_by(
    store: &RecordStore,
    mut relabel: impl FnMut(&RecordKey) -> Option<RecordKey>,
) -> Groups {
    let mut groups = Groups::new();
    for (key, value) in store.iter() {
        if let Some(target) = relabel(key) {
            groups.entry(target).or_default().push(value);
        }
    }
    groups
}

pub(crate) fn reduce_groups(groups: Groups, method: &Method) -> AggResult<RecordStore> {
    let mut out = RecordStore::new();
    for (key, values) in groups {
        if values.is_empty() {
            continue;
        }
        out.insert(key, method.reduce(&values))?;
    }
    Ok(out)
}

/// Key-wise sum; a key missing on one side counts as zero.
pub(crate) fn add_fill_zero(left: &RecordStore, right: &RecordStore) -> AggResult<RecordStore> {
    let mut sums: BTreeMap<RecordKey, Real> = left.iter().map(|(k, v)| (k.clone(), v)).collect();
    for (key, value) in right.iter() {
        *sums.entry(key.clone()).or_insert(0.0) += value;
    }
    Ok(RecordStore::from_pairs(sums)?)
}
