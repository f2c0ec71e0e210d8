#![allow(dead_code)]

use ia_store::{RecordKey, RecordStore};

pub const YEARS: [i32; 2] = [2005, 2010];

pub fn key(scenario: &str, region: &str, variable: &str, unit: &str, year: i32) -> RecordKey {
    RecordKey::new("model_a", scenario, region, variable, unit, year)
}

fn push_series(
    rows: &mut Vec<(RecordKey, f64)>,
    scenario: &str,
    region: &str,
    variable: &str,
    unit: &str,
    values: [f64; 2],
) {
    for (year, value) in YEARS.into_iter().zip(values) {
        rows.push((key(scenario, region, variable, unit, year), value));
    }
}

/// Two years, three regions, energy and emissions trees, a carbon price and
/// population. `Emissions|CO2|Bunkers` is reported at `World` only.
pub fn simple_store() -> RecordStore {
    let mut rows = Vec::new();
    let table: [(&str, &str, &str, [f64; 2]); 25] = [
        ("World", "Primary Energy", "EJ/yr", [12.0, 15.0]),
        ("World", "Primary Energy|Coal", "EJ/yr", [9.0, 10.0]),
        ("World", "Primary Energy|Wind", "EJ/yr", [3.0, 5.0]),
        ("World", "Emissions|CO2", "EJ/yr", [10.0, 14.0]),
        ("World", "Emissions|CO2|Energy", "EJ/yr", [6.0, 8.0]),
        ("World", "Emissions|CO2|AFOLU", "EJ/yr", [3.0, 4.0]),
        ("World", "Emissions|CO2|Bunkers", "EJ/yr", [1.0, 2.0]),
        ("World", "Price|Carbon", "USD/tCO2", [4.0, 27.0]),
        ("World", "Population", "m", [3.0, 5.0]),
        ("reg_a", "Primary Energy", "EJ/yr", [8.0, 9.0]),
        ("reg_a", "Primary Energy|Coal", "EJ/yr", [6.0, 6.0]),
        ("reg_a", "Primary Energy|Wind", "EJ/yr", [2.0, 3.0]),
        ("reg_a", "Emissions|CO2", "EJ/yr", [6.0, 8.0]),
        ("reg_a", "Emissions|CO2|Energy", "EJ/yr", [4.0, 5.0]),
        ("reg_a", "Emissions|CO2|AFOLU", "EJ/yr", [2.0, 3.0]),
        ("reg_a", "Price|Carbon", "USD/tCO2", [1.0, 30.0]),
        ("reg_a", "Population", "m", [2.0, 3.0]),
        ("reg_b", "Primary Energy", "EJ/yr", [4.0, 6.0]),
        ("reg_b", "Primary Energy|Coal", "EJ/yr", [3.0, 4.0]),
        ("reg_b", "Primary Energy|Wind", "EJ/yr", [1.0, 2.0]),
        ("reg_b", "Emissions|CO2", "EJ/yr", [3.0, 4.0]),
        ("reg_b", "Emissions|CO2|Energy", "EJ/yr", [2.0, 3.0]),
        ("reg_b", "Emissions|CO2|AFOLU", "EJ/yr", [1.0, 1.0]),
        ("reg_b", "Price|Carbon", "USD/tCO2", [10.0, 21.0]),
        ("reg_b", "Population", "m", [1.0, 2.0]),
    ];
    for (region, variable, unit, values) in table {
        push_series(&mut rows, "scen_a", region, variable, unit, values);
    }
    RecordStore::from_pairs(rows).unwrap()
}

/// `Secondary Energy|Electricity` over three levels; `scen_b` doubles
/// `scen_a`. Solar is reported for 2010 only.
pub fn recursive_store() -> RecordStore {
    let mut rows = Vec::new();
    for (scenario, factor) in [("scen_a", 1.0), ("scen_b", 2.0)] {
        let series: [(&str, [f64; 2]); 4] = [
            ("Secondary Energy|Electricity", [5.0, 19.0]),
            ("Secondary Energy|Electricity|Wind", [5.0, 17.0]),
            ("Secondary Energy|Electricity|Wind|Offshore", [1.0, 5.0]),
            ("Secondary Energy|Electricity|Wind|Onshore", [4.0, 12.0]),
        ];
        for (variable, [a, b]) in series {
            push_series(&mut rows, scenario, "World", variable, "EJ/yr", [a * factor, b * factor]);
        }
        rows.push((
            key(scenario, "World", "Secondary Energy|Electricity|Solar", "EJ/yr", 2010),
            2.0 * factor,
        ));
    }
    RecordStore::from_pairs(rows).unwrap()
}

/// The store with every key matching `drop` removed.
pub fn without(store: &RecordStore, drop: impl Fn(&RecordKey) -> bool) -> RecordStore {
    store.filter_by(|k| !drop(k))
}

/// The store with `delta` added to the value at `target`.
pub fn shifted(store: &RecordStore, target: &RecordKey, delta: f64) -> RecordStore {
    let pairs = store.iter().map(|(k, v)| {
        let v = if k == target { v + delta } else { v };
        (k.clone(), v)
    });
    RecordStore::from_pairs(pairs).unwrap()
}
