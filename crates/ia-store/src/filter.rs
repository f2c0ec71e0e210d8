//! Row selection over record keys.

use std::collections::BTreeMap;

use ia_core::TimePoint;

use crate::record::{Dimension, RecordKey};

/// Selection criteria; all given criteria must hold for a key to match.
///
/// String criteria accept `*` wildcards. With `keep(false)` the selection is
/// inverted.
#[derive(Debug, Clone)]
pub struct Filter {
    dims: BTreeMap<Dimension, Vec<String>>,
    years: Option<Vec<i32>>,
    times: Option<Vec<TimePoint>>,
    extra: BTreeMap<String, Vec<String>>,
    keep: bool,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            dims: BTreeMap::new(),
            years: None,
            times: None,
            extra: BTreeMap::new(),
            keep: true,
        }
    }
}

fn to_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Vec<String> {
    values.into_iter().map(Into::into).collect()
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dim<S: Into<String>>(mut self, dim: Dimension, values: impl IntoIterator<Item = S>) -> Self {
        self.dims.insert(dim, to_strings(values));
        self
    }

    pub fn model<S: Into<String>>(self, values: impl IntoIterator<Item = S>) -> Self {
        self.dim(Dimension::Model, values)
    }

    pub fn scenario<S: Into<String>>(self, values: impl IntoIterator<Item = S>) -> Self {
        self.dim(Dimension::Scenario, values)
    }

    pub fn region<S: Into<String>>(self, values: impl IntoIterator<Item = S>) -> Self {
        self.dim(Dimension::Region, values)
    }

    pub fn variable<S: Into<String>>(self, values: impl IntoIterator<Item = S>) -> Self {
        self.dim(Dimension::Variable, values)
    }

    pub fn unit<S: Into<String>>(self, values: impl IntoIterator<Item = S>) -> Self {
        self.dim(Dimension::Unit, values)
    }

    /// Match on the calendar year of any time point.
    pub fn year(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years = Some(years.into_iter().collect());
        self
    }

    pub fn time(mut self, times: impl IntoIterator<Item = TimePoint>) -> Self {
        self.times = Some(times.into_iter().collect());
        self
    }

    pub fn extra<S: Into<String>>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        self.extra.insert(column.into(), to_strings(values));
        self
    }

    pub fn keep(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }

    pub fn matches(&self, key: &RecordKey) -> bool {
        self.selects(key) == self.keep
    }

    fn selects(&self, key: &RecordKey) -> bool {
        for (dim, patterns) in &self.dims {
            let value = key.dim(*dim);
            if !patterns.iter().any(|p| pattern_match(p, value)) {
                return false;
            }
        }
        if let Some(years) = &self.years {
            if !years.contains(&key.time.year()) {
                return false;
            }
        }
        if let Some(times) = &self.times {
            if !times.contains(&key.time) {
                return false;
            }
        }
        for (column, patterns) in &self.extra {
            match key.extra.get(column) {
                Some(value) if patterns.iter().any(|p| pattern_match(p, value)) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Glob match supporting `*` (any run of characters, including none).
pub fn pattern_match(pattern: &str, value: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == value;
    }
    let parts: Vec<&str> = pattern.split('*').collect();
    let (first, rest) = match parts.split_first() {
        Some(split) => split,
        None => return value.is_empty(),
    };
    let Some(mut remaining) = value.strip_prefix(first) else {
        return false;
    };
    let (last, middle) = match rest.split_last() {
        Some(split) => split,
        None => return remaining.is_empty(),
    };
    for part in middle {
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }
    remaining.len() >= last.len() && remaining.ends_with(last)
}
