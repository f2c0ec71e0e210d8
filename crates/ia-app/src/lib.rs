//! Shared application service layer for the aggregation engine.
//!
//! Frontends go through this crate to load and save record files, summarize
//! stores and execute the jobs of a configuration file.

pub mod data_service;
pub mod error;
pub mod query;
pub mod run_service;

pub use data_service::{load_records, read_records, save_records, write_records};
pub use error::{AppError, AppResult};
pub use query::{StoreSummary, summarize};
pub use run_service::{
    JobOutcome, JobReport, RunResponse, region_request, run_jobs, time_request, variable_request,
};
