//! Aggregation requests.

use core::fmt;
use core::str::FromStr;

use ia_hierarchy::ComponentsArg;

use crate::Method;

/// One target variable or a list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Targets {
    One(String),
    Many(Vec<String>),
}

impl Targets {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Targets::One(v) => std::slice::from_ref(v),
            Targets::Many(vs) => vs,
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Targets::Many(_))
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.as_slice().iter().any(|v| v == variable)
    }
}

impl From<&str> for Targets {
    fn from(v: &str) -> Self {
        Targets::One(v.to_string())
    }
}

impl From<String> for Targets {
    fn from(v: String) -> Self {
        Targets::One(v)
    }
}

impl From<Vec<String>> for Targets {
    fn from(vs: Vec<String>) -> Self {
        Targets::Many(vs)
    }
}

impl<const N: usize> From<[&str; N]> for Targets {
    fn from(vs: [&str; N]) -> Self {
        Targets::Many(vs.iter().map(|v| v.to_string()).collect())
    }
}

impl fmt::Display for Targets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Targets::One(v) => f.write_str(v),
            Targets::Many(vs) => write!(f, "[{}]", vs.join(", ")),
        }
    }
}

/// Whether aggregation walks down the variable tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recursion {
    /// Single level only.
    #[default]
    Off,
    /// Aggregate every level bottom-up, validating against existing data.
    Validate,
    /// Aggregate every level bottom-up without validation.
    SkipValidate,
}

impl From<bool> for Recursion {
    fn from(on: bool) -> Self {
        if on { Recursion::Validate } else { Recursion::Off }
    }
}

impl FromStr for Recursion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "false" => Ok(Recursion::Off),
            "true" => Ok(Recursion::Validate),
            "skip-validate" => Ok(Recursion::SkipValidate),
            other => Err(format!(
                "invalid recursion mode '{other}', expected true, false or skip-validate"
            )),
        }
    }
}

/// Aggregate variables from their components.
#[derive(Debug, Clone)]
pub struct VariableAggregation {
    pub variable: Targets,
    pub components: Option<ComponentsArg>,
    pub method: Method,
    pub recursive: Recursion,
}

impl VariableAggregation {
    pub fn new(variable: impl Into<Targets>) -> Self {
        Self {
            variable: variable.into(),
            components: None,
            method: Method::Sum,
            recursive: Recursion::Off,
        }
    }

    pub fn components(mut self, components: impl Into<ComponentsArg>) -> Self {
        self.components = Some(components.into());
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn recursive(mut self, recursive: Recursion) -> Self {
        self.recursive = recursive;
        self
    }
}

/// Variables reported only at the parent-region level that are added to the
/// subregion aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RegionComponents {
    #[default]
    None,
    /// Every descendant of the variable present in the region but in no
    /// subregion.
    Auto,
    Explicit(ComponentsArg),
}

impl RegionComponents {
    pub fn is_none(&self) -> bool {
        matches!(self, RegionComponents::None)
    }
}

/// Aggregate subregions into a region.
#[derive(Debug, Clone)]
pub struct RegionAggregation {
    pub variable: Targets,
    pub region: String,
    pub subregions: Option<Vec<String>>,
    pub components: RegionComponents,
    pub method: Method,
    pub weight: Option<String>,
    /// `None` means the default (drop).
    pub drop_negative_weights: Option<bool>,
}

impl RegionAggregation {
    pub fn new(variable: impl Into<Targets>) -> Self {
        Self {
            variable: variable.into(),
            region: "World".to_string(),
            subregions: None,
            components: RegionComponents::None,
            method: Method::Sum,
            weight: None,
            drop_negative_weights: None,
        }
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn subregions<S: Into<String>>(mut self, subregions: impl IntoIterator<Item = S>) -> Self {
        self.subregions = Some(subregions.into_iter().map(Into::into).collect());
        self
    }

    pub fn components(mut self, components: RegionComponents) -> Self {
        self.components = components;
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    pub fn drop_negative_weights(mut self, drop: bool) -> Self {
        self.drop_negative_weights = Some(drop);
        self
    }
}

/// Aggregate the values of an extra index column (e.g. seasons) into one.
#[derive(Debug, Clone)]
pub struct TimeAggregation {
    pub variable: Targets,
    pub column: String,
    pub value: String,
    pub components: Option<Vec<String>>,
    pub method: Method,
}

impl TimeAggregation {
    pub fn new(variable: impl Into<Targets>) -> Self {
        Self {
            variable: variable.into(),
            column: "subannual".to_string(),
            value: "year".to_string(),
            components: None,
            method: Method::Sum,
        }
    }

    pub fn column(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.column = column.into();
        self.value = value.into();
        self
    }

    pub fn components<S: Into<String>>(mut self, components: impl IntoIterator<Item = S>) -> Self {
        self.components = Some(components.into_iter().map(Into::into).collect());
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }
}
