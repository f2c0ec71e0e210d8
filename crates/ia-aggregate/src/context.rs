//! Per-call settings and the diagnostics channel.

use ia_core::{DiagnosticSink, Tolerances};
use ia_hierarchy::{DEFAULT_DELIMITER, RegionMapping, VariableTree, validate_delimiter};
use ia_store::RecordStore;

use crate::AggResult;

/// Everything an operation needs besides the data and the request.
pub struct AggContext<'a> {
    delimiter: String,
    tolerance: Tolerances,
    regions: Option<&'a RegionMapping>,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> AggContext<'a> {
    pub fn new(sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            tolerance: Tolerances::default(),
            regions: None,
            sink,
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> AggResult<Self> {
        let delimiter = delimiter.into();
        validate_delimiter(&delimiter)?;
        self.delimiter = delimiter;
        Ok(self)
    }

    pub fn with_tolerance(mut self, tolerance: Tolerances) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_regions(mut self, regions: &'a RegionMapping) -> Self {
        self.regions = Some(regions);
        self
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn tolerance(&self) -> Tolerances {
        self.tolerance
    }

    pub fn regions(&self) -> Option<&'a RegionMapping> {
        self.regions
    }

    pub fn info(&mut self, message: String) {
        self.sink.info(message);
    }

    pub fn warn(&mut self, message: String) {
        self.sink.warn(message);
    }

    pub(crate) fn tree(&self, store: &RecordStore) -> VariableTree {
        VariableTree::from_store(store, &self.delimiter)
    }
}
