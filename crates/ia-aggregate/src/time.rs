//! Aggregation across the values of an extra index column, typically
//! sub-annual time slices (`subannual = summer, winter -> year`).

use std::collections::BTreeSet;

use ia_store::RecordStore;

use crate::check::{MismatchTable, compare};
use crate::group::{group_by, reduce_groups};
use crate::request::TimeAggregation;
use crate::{AggContext, AggResult};

/// Reduce the rows of each target variable over `req.components` (default:
/// every value of `req.column` except `req.value`) into a row with
/// `req.column = req.value`.
pub fn aggregate_time(
    store: &RecordStore,
    req: &TimeAggregation,
    ctx: &mut AggContext<'_>,
) -> AggResult<RecordStore> {
    let column = req.column.as_str();
    let components: BTreeSet<String> = match &req.components {
        Some(list) => list.iter().cloned().collect(),
        None => store
            .extra_values(column)
            .into_iter()
            .filter(|v| *v != req.value)
            .map(str::to_string)
            .collect(),
    };

    let targets = req.variable.as_slice();
    let groups = group_by(store, |k| {
        if !targets.iter().any(|v| *v == k.variable) {
            return None;
        }
        let slice = k.extra.get(column)?;
        if !components.contains(slice) {
            return None;
        }
        let mut target = k.clone();
        target.extra.insert(column.to_string(), req.value.clone());
        Some(target)
    });
    if groups.is_empty() {
        ctx.info(format!(
            "Cannot aggregate variable '{}' over `{column}` because it has no components.",
            req.variable
        ));
    }
    let mut out = reduce_groups(groups, &req.method)?;
    out.inherit_meta(store.meta());
    Ok(out)
}

/// Compare the `req.column = req.value` rows with the aggregate over the
/// other values of the column.
pub fn check_aggregate_time(
    store: &RecordStore,
    req: &TimeAggregation,
    ctx: &mut AggContext<'_>,
) -> AggResult<Option<MismatchTable>> {
    let aggregated = aggregate_time(store, req, ctx)?;
    if aggregated.is_empty() {
        return Ok(None);
    }

    let targets = req.variable.as_slice();
    let column = req.column.as_str();
    let existing = store.filter_by(|k| {
        targets.iter().any(|v| *v == k.variable) && k.extra.get(column) == Some(&req.value)
    });
    let table = compare(&existing, &aggregated, (column, "components"), ctx.tolerance());
    if table.is_empty() {
        return Ok(None);
    }
    ctx.info(format!(
        "`{}` - {} of {} rows are not aggregates over `{column}`",
        req.variable,
        table.len(),
        table.compared
    ));
    Ok(Some(table))
}
