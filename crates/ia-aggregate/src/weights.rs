//! Weighted averages for region aggregation.

use std::collections::{BTreeMap, BTreeSet};

use ia_core::{Real, TimePoint};
use ia_store::{RecordKey, RecordStore, TextTable};

use crate::{AggContext, AggError, AggResult};

const NEGATIVE_WEIGHTS: &str = "Some weights are negative. Data weighted by negative values \
    will be dropped. To use both positive and negative weights, please use the keyword \
    argument `drop_negative_weights=False`.";

/// Records are matched to their weight on everything but variable and unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct WeightIndex<'a> {
    model: &'a str,
    scenario: &'a str,
    region: &'a str,
    extra: &'a BTreeMap<String, String>,
    time: TimePoint,
}

impl<'a> WeightIndex<'a> {
    fn of(key: &'a RecordKey) -> Self {
        Self {
            model: &key.model,
            scenario: &key.scenario,
            region: &key.region,
            extra: &key.extra,
            time: key.time,
        }
    }
}

fn index_table<'a>(rows: impl IntoIterator<Item = WeightIndex<'a>>, time_col: &str) -> TextTable {
    let rows: Vec<WeightIndex<'a>> = rows.into_iter().collect();
    let extra: BTreeSet<&str> = rows
        .iter()
        .flat_map(|r| r.extra.keys().map(String::as_str))
        .collect();

    let mut headers = vec!["model", "scenario", "region"];
    headers.extend(extra.iter().copied());
    headers.push(time_col);

    let mut table = TextTable::new(headers);
    for row in rows {
        let mut cells = vec![row.model.to_string(), row.scenario.to_string(), row.region.to_string()];
        cells.extend(extra.iter().map(|c| row.extra.get(*c).cloned().unwrap_or_default()));
        cells.push(row.time.to_string());
        table.push_row(cells);
    }
    table
}

/// Weighted average of `variable` over `subregions`, written to `region`.
///
/// A data row without a weight is fatal; a weight without a data row is
/// dropped with a warning. With `drop_negative`, rows with a negative weight
/// leave both the numerator and the denominator.
pub(crate) fn weighted_average(
    store: &RecordStore,
    variable: &str,
    weight: &str,
    subregions: &[String],
    region: &str,
    drop_negative: bool,
    ctx: &mut AggContext<'_>,
) -> AggResult<RecordStore> {
    let in_subregions = |k: &RecordKey| subregions.iter().any(|r| *r == k.region);
    let time_col = store.time_domain().time_col();

    let data: Vec<(&RecordKey, Real)> = store
        .iter()
        .filter(|&(k, _)| k.variable == variable && in_subregions(k))
        .collect();
    let weights: BTreeMap<WeightIndex<'_>, Real> = store
        .iter()
        .filter(|&(k, _)| k.variable == weight && in_subregions(k))
        .map(|(k, w)| (WeightIndex::of(k), w))
        .collect();

    let missing: BTreeSet<WeightIndex<'_>> = data
        .iter()
        .map(|&(k, _)| WeightIndex::of(k))
        .filter(|idx| !weights.contains_key(idx))
        .collect();
    if !missing.is_empty() {
        return Err(AggError::MissingWeights {
            table: index_table(missing, time_col).to_string(),
        });
    }

    let with_data: BTreeSet<WeightIndex<'_>> = data.iter().map(|&(k, _)| WeightIndex::of(k)).collect();
    let unused: Vec<WeightIndex<'_>> = weights
        .keys()
        .filter(|idx| !with_data.contains(*idx))
        .cloned()
        .collect();
    if !unused.is_empty() {
        ctx.warn(format!(
            "Ignoring weights for the following missing data rows:\n{}",
            index_table(unused, time_col)
        ));
    }

    let mut sums: BTreeMap<RecordKey, (Real, Real)> = BTreeMap::new();
    let mut negative = false;
    for (key, value) in data {
        let Some(&w) = weights.get(&WeightIndex::of(key)) else {
            continue;
        };
        if w < 0.0 {
            negative = true;
            // Only the negative row leaves the group; the rest still average.
            if drop_negative {
                continue;
            }
        }
        let mut target = key.clone();
        target.region = region.to_string();
        let entry = sums.entry(target).or_insert((0.0, 0.0));
        entry.0 += value * w;
        entry.1 += w;
    }
    if negative && drop_negative {
        ctx.warn(NEGATIVE_WEIGHTS.to_string());
    }

    let mut out = RecordStore::new();
    for (key, (numerator, denominator)) in sums {
        if denominator == 0.0 {
            ctx.warn(format!("Weights sum to zero, no weighted average for {key}"));
            continue;
        }
        out.insert(key, numerator / denominator)?;
    }
    Ok(out)
}
