//! ia-store: indexed timeseries records and their container.
//!
//! A `RecordStore` maps a composite `RecordKey`
//! (model, scenario, region, variable, unit, extra columns, time) to a value,
//! together with a per-scenario meta side-table.

pub mod filter;
pub mod meta;
pub mod record;
pub mod store;
pub mod table;

pub use filter::{Filter, pattern_match};
pub use meta::{MetaTable, ScenarioId, ScenarioMeta};
pub use record::{Dimension, Record, RecordKey};
pub use store::{OnConflict, RecordStore};
pub use table::TextTable;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Duplicate record: {key}")]
    DuplicateKey { key: String },

    #[error("Cannot append, {count} record(s) already exist (first: {first})")]
    Conflict { count: usize, first: String },

    #[error("Unknown dimension: {name}")]
    UnknownDimension { name: String },

    #[error("Time domain must be datetime to use this method")]
    NotDatetime,

    #[error("Swapping time for year causes duplicates in the index: {key}")]
    SwapDuplicate { key: String },

    #[error(transparent)]
    Core(#[from] ia_core::IaError),
}
