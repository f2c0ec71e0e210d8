//! Aggregation along the region hierarchy.

use std::collections::{BTreeMap, BTreeSet};

use ia_hierarchy::subregions_of;
use ia_store::RecordStore;

use crate::check::{MismatchTable, compare};
use crate::group::{add_fill_zero, group_by, reduce_groups};
use crate::request::{RegionAggregation, RegionComponents};
use crate::variable::aggregate_mapping;
use crate::weights::weighted_average;
use crate::{AggContext, AggError, AggResult};

fn validate(req: &RegionAggregation) -> AggResult<()> {
    let has_components = !req.components.is_none();
    if has_components && req.variable.is_many() {
        return Err(AggError::ListWithComponents);
    }
    if has_components && req.weight.is_some() {
        return Err(AggError::WeightWithComponents);
    }
    if let RegionComponents::Explicit(arg) = &req.components {
        arg.as_list()?;
    }
    if req.weight.is_some() && !req.method.is_sum() {
        return Err(AggError::WeightRequiresSum {
            method: req.method.name().to_string(),
        });
    }
    if req.drop_negative_weights.is_some() && req.weight.is_none() {
        return Err(AggError::DropNegativeWithoutWeight);
    }
    Ok(())
}

/// Variables reported at `region` below `variable` that no subregion reports.
fn region_only_descendants(
    store: &RecordStore,
    variable: &str,
    region: &str,
    subregions: &[String],
    ctx: &AggContext<'_>,
) -> Vec<String> {
    let at_region = store.filter_by(|k| k.region == region);
    let at_subregions = store.filter_by(|k| subregions.iter().any(|r| *r == k.region));
    let reported_below: BTreeSet<String> =
        ctx.tree(&at_subregions).descendants(variable).into_iter().collect();
    ctx.tree(&at_region)
        .descendants(variable)
        .into_iter()
        .filter(|v| !reported_below.contains(v))
        .collect()
}

/// Aggregate the subregions of `req.region` for each target variable.
///
/// Subregions come from `req.subregions`, then from the context's region
/// mapping, then from every other region reporting the targets or the weight.
pub fn aggregate_region(
    store: &RecordStore,
    req: &RegionAggregation,
    ctx: &mut AggContext<'_>,
) -> AggResult<RecordStore> {
    validate(req)?;
    let targets = req.variable.as_slice();
    let region = req.region.as_str();
    let mut reported = targets.to_vec();
    reported.extend(req.weight.iter().cloned());
    let subregions = subregions_of(store, region, &reported, req.subregions.as_deref(), ctx.regions());

    let mut out = RecordStore::new();
    for variable in targets {
        let has_rows = store
            .keys()
            .any(|k| k.variable == *variable && subregions.iter().any(|r| *r == k.region));
        if !has_rows {
            ctx.info(format!(
                "Cannot aggregate variable '{variable}' to '{region}' because it does not exist in any subregion."
            ));
            continue;
        }

        let mut aggregated = match &req.weight {
            Some(weight) => weighted_average(
                store,
                variable,
                weight,
                &subregions,
                region,
                req.drop_negative_weights.unwrap_or(true),
                ctx,
            )?,
            None => {
                let groups = group_by(store, |k| {
                    if k.variable != *variable || !subregions.iter().any(|r| *r == k.region) {
                        return None;
                    }
                    let mut target = k.clone();
                    target.region = region.to_string();
                    Some(target)
                });
                reduce_groups(groups, &req.method)?
            }
        };

        let components = match &req.components {
            RegionComponents::None => Vec::new(),
            RegionComponents::Auto => {
                region_only_descendants(store, variable, region, &subregions, ctx)
            }
            RegionComponents::Explicit(arg) => arg.as_list()?.to_vec(),
        };
        if !components.is_empty() {
            let mapping: BTreeMap<String, String> =
                components.into_iter().map(|c| (c, variable.clone())).collect();
            let at_region = store.filter_by(|k| k.region == region);
            let extra = aggregate_mapping(&at_region, &mapping, &req.method)?;
            aggregated = add_fill_zero(&aggregated, &extra)?;
        }

        out.merge(aggregated, ia_store::OnConflict::Fail)?;
    }
    out.inherit_meta(store.meta());
    Ok(out)
}

/// Compare each target at `req.region` with the aggregate of its subregions.
///
/// Returns `None` when the target is missing at the region, when nothing
/// could be aggregated, or when every row matches.
pub fn check_aggregate_region(
    store: &RecordStore,
    req: &RegionAggregation,
    ctx: &mut AggContext<'_>,
) -> AggResult<Option<MismatchTable>> {
    validate(req)?;
    let region = req.region.as_str();
    let targets = req.variable.as_slice();

    let existing = store.filter_by(|k| k.region == region && targets.iter().any(|v| *v == k.variable));
    if existing.is_empty() {
        ctx.info(format!(
            "Variable '{}' does not exist in region '{region}'.",
            req.variable
        ));
        return Ok(None);
    }

    let aggregated = aggregate_region(store, req, ctx)?;
    if aggregated.is_empty() {
        return Ok(None);
    }

    let table = compare(&existing, &aggregated, ("region", "subregions"), ctx.tolerance());
    if table.is_empty() {
        return Ok(None);
    }
    ctx.info(format!(
        "`{}` - {} of {} rows are not aggregates of subregions",
        req.variable,
        table.len(),
        table.compared
    ));
    Ok(Some(table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Method;
    use ia_core::CollectingSink;
    use ia_hierarchy::ComponentsArg;

    #[test]
    fn usage_error_precedence() {
        let store = RecordStore::new();
        let mut sink = CollectingSink::new();
        let mut ctx = AggContext::new(&mut sink);

        let both = RegionAggregation::new("Price|Carbon")
            .weight("Emissions|CO2")
            .components(RegionComponents::Auto);
        assert_eq!(aggregate_region(&store, &both, &mut ctx).unwrap_err(), AggError::WeightWithComponents);

        let max = RegionAggregation::new("Price|Carbon").weight("Emissions|CO2").method(Method::Max);
        assert_eq!(
            aggregate_region(&store, &max, &mut ctx).unwrap_err(),
            AggError::WeightRequiresSum { method: "max".into() }
        );

        let drop = RegionAggregation::new("Price|Carbon").drop_negative_weights(false);
        assert_eq!(aggregate_region(&store, &drop, &mut ctx).unwrap_err(), AggError::DropNegativeWithoutWeight);

        let mapping = RegionAggregation::new("Primary Energy").components(RegionComponents::Explicit(
            ComponentsArg::Mapping([("Primary Energy|Coal".to_string(), "foo".to_string())].into()),
        ));
        assert!(matches!(
            aggregate_region(&store, &mapping, &mut ctx).unwrap_err(),
            AggError::Hierarchy(_)
        ));
        assert!(sink.events().is_empty());
    }
}
