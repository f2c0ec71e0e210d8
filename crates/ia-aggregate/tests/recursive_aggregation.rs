mod common;

use common::{key, recursive_store, shifted, without};
use ia_aggregate::*;
use ia_core::{CollectingSink, Level, Tolerances};
use ia_hierarchy::ComponentsArg;
use ia_store::Filter;

const ELECTRICITY: &str = "Secondary Energy|Electricity";
const WIND: &str = "Secondary Energy|Electricity|Wind";

#[test]
fn rebuilds_missing_levels() {
    let store = recursive_store();
    let mut minimal = without(&store, |k| k.variable == ELECTRICITY || k.variable == WIND);
    let mut sink = CollectingSink::new();
    let mut ctx = AggContext::new(&mut sink);
    let req = VariableAggregation::new(ELECTRICITY).recursive(Recursion::Validate);

    let out = aggregate(&minimal, &req, &mut ctx).unwrap();
    let expected = store.filter(&Filter::new().variable([ELECTRICITY, WIND]));
    assert!(out.approx_eq(&expected, Tolerances::default()));

    append_into(&mut minimal, out).unwrap();
    assert!(minimal.approx_eq(&store, Tolerances::default()));
}

#[test]
fn inconsistent_intermediate_level() {
    let full = shifted(
        &shifted(&recursive_store(), &key("scen_a", "World", ELECTRICITY, "EJ/yr", 2005), 2.0),
        &key("scen_a", "World", WIND, "EJ/yr", 2005),
        2.0,
    );
    let mut minimal = without(&full, |k| {
        (k.scenario == "scen_a" && k.variable == ELECTRICITY)
            || (k.scenario == "scen_b" && (k.variable == ELECTRICITY || k.variable == WIND))
    });
    let before = minimal.clone();
    let mut sink = CollectingSink::new();
    let mut ctx = AggContext::new(&mut sink);

    let validated = VariableAggregation::new(ELECTRICITY).recursive(Recursion::Validate);
    let err = aggregate(&minimal, &validated, &mut ctx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Consistency);
    assert!(err.to_string().starts_with("Aggregated values are inconsistent with existing data:"));
    assert_eq!(minimal, before);

    let skipped = VariableAggregation::new(ELECTRICITY).recursive(Recursion::SkipValidate);
    let out = aggregate(&minimal, &skipped, &mut ctx).unwrap();
    append_into(&mut minimal, out).unwrap();
    assert!(minimal.approx_eq(&full, Tolerances::default()));
}

#[test]
fn several_targets() {
    let store = recursive_store();
    let minimal = without(&store, |k| k.variable == WIND);
    let mut sink = CollectingSink::new();
    let mut ctx = AggContext::new(&mut sink);

    let req = VariableAggregation::new([WIND, ELECTRICITY]).recursive(Recursion::SkipValidate);
    let out = aggregate(&minimal, &req, &mut ctx).unwrap();
    let expected = store.filter(&Filter::new().variable([WIND]));
    assert!(out.approx_eq(&expected, Tolerances::default()));
}

#[test]
fn leaf_target_has_no_levels() {
    let store = recursive_store();
    let mut sink = CollectingSink::new();
    let mut ctx = AggContext::new(&mut sink);
    let leaf = "Secondary Energy|Electricity|Solar";

    let req = VariableAggregation::new(leaf).recursive(Recursion::Validate);
    assert!(aggregate(&store, &req, &mut ctx).unwrap().is_empty());
    let msg = format!("Cannot aggregate variable '{leaf}' because it has no components.");
    assert_eq!(sink.level_of(&msg), Some(Level::Info));
}

#[test]
fn rejects_explicit_components() {
    let store = recursive_store();
    let mut sink = CollectingSink::new();
    let mut ctx = AggContext::new(&mut sink);

    let req = VariableAggregation::new(ELECTRICITY)
        .components(ComponentsArg::list([WIND]))
        .recursive("skip-validate".parse().unwrap());
    let err = aggregate(&store, &req, &mut ctx).unwrap_err();
    assert_eq!(err, AggError::RecursiveWithComponents);
    assert_eq!(err.kind(), ErrorKind::Usage);
}
