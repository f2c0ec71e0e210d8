//! Whole-store consistency: every variable against its components and
//! against its subregions.

use core::fmt;
use std::collections::BTreeMap;

use ia_core::Real;
use ia_store::{RecordKey, RecordStore, TextTable};

use crate::check::MismatchTable;
use crate::region::check_aggregate_region;
use crate::request::{RegionAggregation, RegionComponents, VariableAggregation};
use crate::variable::check_aggregate;
use crate::{AggContext, AggResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Components,
    Subregions,
}

/// Existing and aggregated value per check that flagged a key.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConsistencyEntry {
    pub components: Option<(Real, Real)>,
    pub subregions: Option<(Real, Real)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsistencyReport {
    entries: BTreeMap<RecordKey, ConsistencyEntry>,
}

impl ConsistencyReport {
    fn absorb(&mut self, kind: CheckKind, table: MismatchTable) {
        for row in table.rows {
            let entry = self.entries.entry(row.key).or_default();
            let pair = Some((row.existing, row.aggregated));
            match kind {
                CheckKind::Components => entry.components = pair,
                CheckKind::Subregions => entry.subregions = pair,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &RecordKey) -> Option<&ConsistencyEntry> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RecordKey, &ConsistencyEntry)> {
        self.entries.iter()
    }

    /// Rows as `[variable, components, region, subregions]`, NaN where a
    /// check did not flag the key.
    pub fn values(&self) -> Vec<[Real; 4]> {
        let split = |pair: Option<(Real, Real)>| pair.unwrap_or((Real::NAN, Real::NAN));
        self.entries
            .values()
            .map(|e| {
                let (a, b) = split(e.components);
                let (c, d) = split(e.subregions);
                [a, b, c, d]
            })
            .collect()
    }
}

impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut table = TextTable::new([
            "model",
            "scenario",
            "region",
            "variable",
            "unit",
            "time",
            "variable",
            "components",
            "region",
            "subregions",
        ]);
        for ((key, _), values) in self.entries.iter().zip(self.values()) {
            let mut cells = vec![
                key.model.clone(),
                key.scenario.clone(),
                key.region.clone(),
                key.variable.clone(),
                key.unit.clone(),
                key.time.to_string(),
            ];
            cells.extend(values.iter().map(|v| v.to_string()));
            table.push_row(cells);
        }
        write!(f, "{table}")
    }
}

/// Check every variable against its components (variable tree) and against
/// its subregions at `World`. With `components`, region-level-only
/// descendants count towards the region aggregate.
pub fn check_internal_consistency(
    store: &RecordStore,
    components: bool,
    ctx: &mut AggContext<'_>,
) -> AggResult<Option<ConsistencyReport>> {
    let region_components = if components {
        RegionComponents::Auto
    } else {
        RegionComponents::None
    };

    let mut report = ConsistencyReport::default();
    let variables: Vec<String> = store.variables().into_iter().map(str::to_string).collect();
    for variable in variables {
        let by_components = VariableAggregation::new(variable.clone());
        if let Some(table) = check_aggregate(store, &by_components, ctx)? {
            report.absorb(CheckKind::Components, table);
        }
        let by_regions = RegionAggregation::new(variable).components(region_components.clone());
        if let Some(table) = check_aggregate_region(store, &by_regions, ctx)? {
            report.absorb(CheckKind::Subregions, table);
        }
    }

    Ok(if report.is_empty() { None } else { Some(report) })
}
