//! Bottom-up aggregation over every level of a variable subtree.

use std::collections::BTreeMap;

use ia_store::{OnConflict, RecordStore};

use crate::check::compare;
use crate::request::Targets;
use crate::variable::aggregate_mapping;
use crate::{AggContext, AggError, AggResult, Method};

/// Aggregate each target from its deepest descendants upwards.
///
/// Every level is computed from the store extended by the levels below it.
/// Aggregates that collide with existing records are validated (when
/// `validate` is set) and never overwrite them; only new records are
/// returned.
pub(crate) fn aggregate_recursive(
    store: &RecordStore,
    targets: &Targets,
    method: &Method,
    validate: bool,
    ctx: &mut AggContext<'_>,
) -> AggResult<RecordStore> {
    let mut out = RecordStore::new();
    for variable in targets.as_slice() {
        let levels = aggregate_subtree(store, variable, method, validate, ctx)?;
        out.merge(levels, OnConflict::Replace)?;
    }
    out.inherit_meta(store.meta());
    Ok(out)
}

fn aggregate_subtree(
    store: &RecordStore,
    variable: &str,
    method: &Method,
    validate: bool,
    ctx: &mut AggContext<'_>,
) -> AggResult<RecordStore> {
    let prefix = format!("{variable}{}", ctx.delimiter());
    let mut working =
        store.filter_by(|k| k.variable == variable || k.variable.starts_with(&prefix));

    let tree = ctx.tree(&working);
    let root_depth = tree.depth(variable);
    let deepest = match tree.max_depth() {
        Some(depth) if depth > root_depth => depth,
        _ => {
            ctx.info(format!(
                "Cannot aggregate variable '{variable}' because it has no components."
            ));
            return Ok(RecordStore::new());
        }
    };

    let mut fresh = RecordStore::new();
    for depth in (root_depth + 1..=deepest).rev() {
        let tree = ctx.tree(&working);
        let mapping: BTreeMap<String, String> = tree
            .variables_at_depth(depth)
            .into_iter()
            .filter_map(|child| {
                let parent = tree.parent(&child)?.to_string();
                Some((child, parent))
            })
            .collect();
        let aggregated = aggregate_mapping(&working, &mapping, method)?;

        if validate {
            let existing = working.filter_by(|k| aggregated.contains_key(k));
            let overlap = aggregated.filter_by(|k| working.contains_key(k));
            let table = compare(&existing, &overlap, ("variable", "components"), ctx.tolerance());
            if !table.is_empty() {
                return Err(AggError::Inconsistent {
                    table: table.to_string(),
                });
            }
        }

        let level = aggregated.filter_by(|k| !working.contains_key(k));
        working.merge(level.clone(), OnConflict::Fail)?;
        fresh.merge(level, OnConflict::Fail)?;
    }
    Ok(fresh)
}
