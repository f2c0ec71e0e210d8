//! Comparing aggregates against existing data.

use core::fmt;
use std::collections::{BTreeMap, BTreeSet};

use ia_core::{Real, Tolerances, nearly_equal};
use ia_store::{RecordKey, RecordStore, ScenarioId, TextTable};

use crate::AggContext;

/// One key whose existing and aggregated values disagree. A side without a
/// record is NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct MismatchRow {
    pub key: RecordKey,
    pub existing: Real,
    pub aggregated: Real,
}

/// Mismatches of one check, sorted by key.
#[derive(Debug, Clone, PartialEq)]
pub struct MismatchTable {
    /// Column names of the existing and the aggregated side.
    pub labels: (String, String),
    pub rows: Vec<MismatchRow>,
    /// Number of existing records that took part in the comparison.
    pub compared: usize,
}

impl MismatchTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `[existing, aggregated]` per row.
    pub fn values(&self) -> Vec<[Real; 2]> {
        self.rows.iter().map(|r| [r.existing, r.aggregated]).collect()
    }

    pub fn scenarios(&self) -> BTreeSet<ScenarioId> {
        self.rows.iter().map(|r| r.key.scenario_id()).collect()
    }

    pub fn to_text_table(&self) -> TextTable {
        let extra: BTreeSet<&str> = self
            .rows
            .iter()
            .flat_map(|r| r.key.extra.keys().map(String::as_str))
            .collect();
        let time_col = if self.rows.iter().all(|r| r.key.time.is_year()) { "year" } else { "time" };

        let mut headers = vec!["model", "scenario", "region", "variable", "unit"];
        headers.extend(extra.iter().copied());
        headers.push(time_col);
        headers.push(&self.labels.0);
        headers.push(&self.labels.1);

        let mut table = TextTable::new(headers);
        for row in &self.rows {
            let k = &row.key;
            let mut cells = vec![
                k.model.clone(),
                k.scenario.clone(),
                k.region.clone(),
                k.variable.clone(),
                k.unit.clone(),
            ];
            cells.extend(extra.iter().map(|c| k.extra.get(*c).cloned().unwrap_or_default()));
            cells.push(k.time.to_string());
            cells.push(row.existing.to_string());
            cells.push(row.aggregated.to_string());
            table.push_row(cells);
        }
        table
    }
}

impl fmt::Display for MismatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text_table())
    }
}

/// Outer-join `existing` and `aggregated` on the full key and keep every key
/// present on one side only or whose values differ beyond `tol`.
pub fn compare(
    existing: &RecordStore,
    aggregated: &RecordStore,
    labels: (&str, &str),
    tol: Tolerances,
) -> MismatchTable {
    let mut joined: BTreeMap<&RecordKey, (Real, Real)> = BTreeMap::new();
    for (key, value) in existing.iter() {
        joined.insert(key, (value, Real::NAN));
    }
    for (key, value) in aggregated.iter() {
        joined.entry(key).or_insert((Real::NAN, Real::NAN)).1 = value;
    }

    let rows = joined
        .into_iter()
        .filter(|(_, (a, b))| !nearly_equal(*a, *b, tol))
        .map(|(key, (existing, aggregated))| MismatchRow {
            key: key.clone(),
            existing,
            aggregated,
        })
        .collect();

    MismatchTable {
        labels: (labels.0.to_string(), labels.1.to_string()),
        rows,
        compared: existing.len(),
    }
}

/// Flag every scenario with a mismatch as excluded in `store`'s meta.
pub fn exclude_on_fail(store: &mut RecordStore, table: &MismatchTable, ctx: &mut AggContext<'_>) {
    let scenarios = table.scenarios();
    if scenarios.is_empty() {
        return;
    }
    let n = scenarios.len();
    for id in scenarios {
        store.meta_mut().set_exclude(id, true);
    }
    let s = if n == 1 { "" } else { "s" };
    ctx.info(format!("{n} non-valid scenario{s} will be excluded"));
}
