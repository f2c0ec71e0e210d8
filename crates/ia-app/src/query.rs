//! Summaries of loaded record stores.

use ia_core::{TimeDomain, TimePoint};
use ia_store::RecordStore;

/// Size and coverage of a store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSummary {
    pub record_count: usize,
    pub scenario_count: usize,
    pub excluded_count: usize,
    pub regions: Vec<String>,
    pub variables: Vec<String>,
    pub time_domain: TimeDomain,
    pub time_range: Option<(TimePoint, TimePoint)>,
}

pub fn summarize(store: &RecordStore) -> StoreSummary {
    let times = store.time_points();
    let time_range = match (times.first(), times.last()) {
        (Some(first), Some(last)) => Some((*first, *last)),
        _ => None,
    };

    StoreSummary {
        record_count: store.len(),
        scenario_count: store.scenarios().len(),
        excluded_count: store.meta().excluded().len(),
        regions: store.regions().into_iter().map(str::to_string).collect(),
        variables: store.variables().into_iter().map(str::to_string).collect(),
        time_domain: store.time_domain(),
        time_range,
    }
}
