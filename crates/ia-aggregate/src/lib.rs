//! Aggregation and consistency validation for hierarchical timeseries.
//!
//! Records are combined along two independent hierarchies:
//! - variables, whose tree is induced by a delimiter (`"Primary Energy|Coal"`
//!   is a component of `"Primary Energy"`)
//! - regions, whose tree comes from a mapping or from the data itself
//!
//! Every aggregation has a `check_*` counterpart that reports divergences
//! between the aggregate and existing data without mutating anything.
//!
//! # Architecture
//!
//! - Operations take the store by reference and return a new `RecordStore`;
//!   callers opt into in-place appends with [`append_into`]
//! - Diagnostics flow through the [`AggContext`] to a swappable sink
//! - Usage errors are raised before any data is touched

pub mod check;
pub mod consistency;
pub mod context;
pub mod error;
pub mod method;
pub mod recursive;
pub mod region;
pub mod request;
pub mod time;
pub mod variable;

mod group;
mod weights;

pub use check::{MismatchRow, MismatchTable, compare, exclude_on_fail};
pub use consistency::{CheckKind, ConsistencyEntry, ConsistencyReport, check_internal_consistency};
pub use context::AggContext;
pub use error::{AggError, AggResult, ErrorKind};
pub use method::{Method, Reducer};
pub use region::{aggregate_region, check_aggregate_region};
pub use request::{
    RegionAggregation, RegionComponents, Recursion, Targets, TimeAggregation, VariableAggregation,
};
pub use time::{aggregate_time, check_aggregate_time};
pub use variable::{aggregate, check_aggregate, check_aggregate_filtered};

use ia_store::{OnConflict, RecordStore};

/// Append aggregated records to `store`; fails without changes if any key
/// already exists.
pub fn append_into(store: &mut RecordStore, aggregated: RecordStore) -> AggResult<()> {
    store.merge(aggregated, OnConflict::Fail)?;
    Ok(())
}
