//! ia-core: stable foundation for the aggregation engine.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - time (year / datetime time points and the time domain descriptor)
//! - diagnostics (the sink every engine operation reports through)
//! - error (shared error types)

pub mod diagnostics;
pub mod error;
pub mod numeric;
pub mod time;

// Re-exports: nice ergonomics for downstream crates
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, Level, TracingSink};
pub use error::{IaError, IaResult};
pub use numeric::*;
pub use time::{TimeDomain, TimePoint};
