//! Integration tests for ia-hierarchy over a record store.

use ia_hierarchy::{RegionMapping, VariableTree, components_of, subregions_of};
use ia_store::{RecordKey, RecordStore};

fn store() -> RecordStore {
    let rows = [
        ("World", "Secondary Energy|Electricity|Wind|Offshore", 1.0),
        ("World", "Secondary Energy|Electricity|Wind|Onshore", 4.0),
        ("World", "Secondary Energy|Electricity|Solar", 2.0),
        ("reg_a", "Secondary Energy|Electricity|Solar", 1.0),
    ];
    RecordStore::from_pairs(rows.iter().map(|(region, variable, value)| {
        (
            RecordKey::new("model_a", "scen_a", *region, *variable, "EJ/yr", 2005),
            *value,
        )
    }))
    .unwrap()
}

#[test]
fn missing_intermediate_levels_hide_grandchildren() {
    let tree = VariableTree::from_store(&store(), "|");

    // `Secondary Energy|Electricity|Wind` is not in the data yet
    let comps = components_of(&tree, "Secondary Energy|Electricity", None).unwrap();
    assert_eq!(comps, vec!["Secondary Energy|Electricity|Solar"]);

    let wind = components_of(&tree, "Secondary Energy|Electricity|Wind", None).unwrap();
    assert_eq!(wind.len(), 2);
    assert_eq!(tree.max_depth(), Some(3));
}

#[test]
fn region_mapping_from_yaml() {
    let yaml = "World: [reg_a, reg_b]\nEurope: [DEU, FRA]\n";
    let mapping: RegionMapping = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping.get("Europe"), Some(vec!["DEU".to_string(), "FRA".to_string()]));

    let subs = subregions_of(
        &store(),
        "World",
        &["Secondary Energy|Electricity|Solar".to_string()],
        None,
        Some(&mapping),
    );
    assert_eq!(subs, vec!["reg_a", "reg_b"]);
}
