//! Aggregation along the variable hierarchy.

use std::collections::BTreeMap;

use ia_hierarchy::{ComponentsArg, components_of};
use ia_store::{Filter, RecordStore};

use crate::check::{MismatchTable, compare, exclude_on_fail};
use crate::group::{group_by, reduce_groups};
use crate::request::{Recursion, Targets, VariableAggregation};
use crate::{AggContext, AggError, AggResult, Method, recursive};

fn validate(req: &VariableAggregation, recursive: Recursion) -> AggResult<()> {
    if let Some(components) = &req.components {
        components.as_list()?;
        if recursive != Recursion::Off {
            return Err(AggError::RecursiveWithComponents);
        }
        if req.variable.is_many() {
            return Err(AggError::ListWithComponents);
        }
    }
    Ok(())
}

/// Aggregate each target variable from its components.
///
/// Output keys equal the component keys with the variable replaced by the
/// target; region, unit and extra columns are kept.
pub fn aggregate(
    store: &RecordStore,
    req: &VariableAggregation,
    ctx: &mut AggContext<'_>,
) -> AggResult<RecordStore> {
    validate(req, req.recursive)?;
    match req.recursive {
        Recursion::Off => {
            aggregate_level(store, &req.variable, req.components.as_ref(), &req.method, ctx)
        }
        Recursion::Validate => recursive::aggregate_recursive(store, &req.variable, &req.method, true, ctx),
        Recursion::SkipValidate => {
            recursive::aggregate_recursive(store, &req.variable, &req.method, false, ctx)
        }
    }
}

/// Component-to-parent mapping for `targets`; logs every target without
/// components.
pub(crate) fn component_mapping(
    store: &RecordStore,
    targets: &Targets,
    explicit: Option<&ComponentsArg>,
    ctx: &mut AggContext<'_>,
) -> AggResult<BTreeMap<String, String>> {
    let tree = ctx.tree(store);
    let mut mapping = BTreeMap::new();
    for variable in targets.as_slice() {
        let components = components_of(&tree, variable, explicit)?;
        if components.is_empty() {
            ctx.info(format!(
                "Cannot aggregate variable '{variable}' because it has no components."
            ));
            continue;
        }
        for component in components {
            mapping.insert(component, variable.clone());
        }
    }
    Ok(mapping)
}

/// Reduce every record whose variable is a key of `mapping` onto the mapped
/// parent variable.
pub(crate) fn aggregate_mapping(
    store: &RecordStore,
    mapping: &BTreeMap<String, String>,
    method: &Method,
) -> AggResult<RecordStore> {
    let groups = group_by(store, |key| {
        let parent = mapping.get(&key.variable)?;
        let mut target = key.clone();
        target.variable = parent.clone();
        Some(target)
    });
    reduce_groups(groups, method)
}

fn aggregate_level(
    store: &RecordStore,
    targets: &Targets,
    explicit: Option<&ComponentsArg>,
    method: &Method,
    ctx: &mut AggContext<'_>,
) -> AggResult<RecordStore> {
    let mapping = component_mapping(store, targets, explicit, ctx)?;
    let mut out = aggregate_mapping(store, &mapping, method)?;
    out.inherit_meta(store.meta());
    Ok(out)
}

/// Compare each target variable with the aggregate of its components.
///
/// Returns `None` when nothing could be aggregated or every row matches.
/// Recursion settings of `req` are ignored; a check covers one level.
pub fn check_aggregate(
    store: &RecordStore,
    req: &VariableAggregation,
    ctx: &mut AggContext<'_>,
) -> AggResult<Option<MismatchTable>> {
    validate(req, Recursion::Off)?;
    let aggregated = aggregate_level(store, &req.variable, req.components.as_ref(), &req.method, ctx)?;
    if aggregated.is_empty() {
        return Ok(None);
    }

    let existing = store.filter_by(|k| req.variable.contains(&k.variable));
    let table = compare(&existing, &aggregated, ("variable", "components"), ctx.tolerance());
    if table.is_empty() {
        return Ok(None);
    }
    ctx.info(format!(
        "`{}` - {} of {} rows are not aggregates of components",
        req.variable,
        table.len(),
        table.compared
    ));
    Ok(Some(table))
}

/// Run [`check_aggregate`] on the part of `store` selected by `filter`,
/// optionally flagging mismatching scenarios as excluded.
pub fn check_aggregate_filtered(
    store: &mut RecordStore,
    filter: &Filter,
    req: &VariableAggregation,
    exclude: bool,
    ctx: &mut AggContext<'_>,
) -> AggResult<Option<MismatchTable>> {
    let selected = store.filter(filter);
    let table = check_aggregate(&selected, req, ctx)?;
    if exclude {
        if let Some(table) = &table {
            exclude_on_fail(store, table, ctx);
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ia_core::{CollectingSink, Level};
    use ia_store::RecordKey;

    fn store() -> RecordStore {
        let k = |region: &str, variable: &str| RecordKey::new("m", "s", region, variable, "EJ/yr", 2005);
        RecordStore::from_pairs([
            (k("World", "Primary Energy"), 12.0),
            (k("World", "Primary Energy|Coal"), 9.0),
            (k("World", "Primary Energy|Wind"), 3.0),
            (k("reg_a", "Primary Energy|Wind"), 2.0),
        ])
        .unwrap()
    }

    #[test]
    fn region_and_unit_are_kept() {
        let mut sink = CollectingSink::new();
        let mut ctx = AggContext::new(&mut sink);
        let out = aggregate(&store(), &VariableAggregation::new("Primary Energy"), &mut ctx).unwrap();
        let world = RecordKey::new("m", "s", "World", "Primary Energy", "EJ/yr", 2005);
        let reg_a = RecordKey::new("m", "s", "reg_a", "Primary Energy", "EJ/yr", 2005);
        assert_eq!(out.get(&world), Some(12.0));
        assert_eq!(out.get(&reg_a), Some(2.0));
    }

    #[test]
    fn usage_errors_come_first() {
        let mut sink = CollectingSink::new();
        let mut ctx = AggContext::new(&mut sink);
        let listed = VariableAggregation::new(["Primary Energy", "Emissions|CO2"])
            .components(ComponentsArg::list(["Primary Energy|Coal"]));
        assert_eq!(aggregate(&store(), &listed, &mut ctx).unwrap_err(), AggError::ListWithComponents);

        let recursive = VariableAggregation::new("Primary Energy")
            .components(ComponentsArg::list(["Primary Energy|Coal"]))
            .recursive(Recursion::Validate);
        assert_eq!(
            aggregate(&store(), &recursive, &mut ctx).unwrap_err(),
            AggError::RecursiveWithComponents
        );
        assert!(sink.events().is_empty());
    }

    #[test]
    fn check_matches_target_names_literally() {
        let k = |variable: &str| RecordKey::new("m", "s", "World", variable, "EJ/yr", 2005);
        let store = RecordStore::from_pairs([
            (k("Primary*"), 5.0),
            (k("Primary*|Coal"), 5.0),
            (k("Primary Energy"), 1.0),
        ])
        .unwrap();
        let mut sink = CollectingSink::new();
        let mut ctx = AggContext::new(&mut sink);
        let checked = check_aggregate(&store, &VariableAggregation::new("Primary*"), &mut ctx).unwrap();
        assert!(checked.is_none());
    }

    #[test]
    fn leaf_variable_logs_once() {
        let mut sink = CollectingSink::new();
        let mut ctx = AggContext::new(&mut sink);
        let out = aggregate(&store(), &VariableAggregation::new("Primary Energy|Coal"), &mut ctx).unwrap();
        assert!(out.is_empty());
        let msg = "Cannot aggregate variable 'Primary Energy|Coal' because it has no components.";
        assert_eq!(sink.level_of(msg), Some(Level::Info));
        assert_eq!(sink.events().len(), 1);
    }
}
