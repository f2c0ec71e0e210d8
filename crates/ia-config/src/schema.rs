//! Configuration schema definitions.

use ia_core::Tolerances;
use ia_hierarchy::{ComponentsArg, HierarchyResult, RegionMapping};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub version: u32,
    pub name: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub tolerance: ToleranceDef,
    #[serde(default)]
    pub regions: Vec<RegionDef>,
    #[serde(default)]
    pub jobs: Vec<JobDef>,
}

impl Config {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: crate::LATEST_VERSION,
            name: name.into(),
            delimiter: default_delimiter(),
            tolerance: ToleranceDef::default(),
            regions: Vec::new(),
            jobs: Vec::new(),
        }
    }

    pub fn region_mapping(&self) -> HierarchyResult<RegionMapping> {
        let mut mapping = RegionMapping::new();
        for region in &self.regions {
            mapping.insert(region.name.clone(), region.subregions.iter().cloned())?;
        }
        Ok(mapping)
    }
}

fn default_delimiter() -> String {
    ia_hierarchy::DEFAULT_DELIMITER.to_string()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ToleranceDef {
    #[serde(default = "default_abs")]
    pub abs: f64,
    #[serde(default = "default_rel")]
    pub rel: f64,
}

fn default_abs() -> f64 {
    Tolerances::default().abs
}

fn default_rel() -> f64 {
    Tolerances::default().rel
}

impl Default for ToleranceDef {
    fn default() -> Self {
        Self {
            abs: default_abs(),
            rel: default_rel(),
        }
    }
}

impl From<ToleranceDef> for Tolerances {
    fn from(def: ToleranceDef) -> Self {
        Tolerances {
            abs: def.abs,
            rel: def.rel,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionDef {
    pub name: String,
    pub subregions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobDef {
    pub id: String,
    /// Run the `check_*` counterpart instead of aggregating.
    #[serde(default)]
    pub check: bool,
    /// Merge aggregated records into the working store.
    #[serde(default)]
    pub append: bool,
    pub kind: JobKindDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobKindDef {
    Variable {
        variable: TargetsDef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        components: Option<ComponentsArg>,
        #[serde(default = "default_method")]
        method: String,
        #[serde(default)]
        recursive: RecursiveDef,
    },
    Region {
        variable: TargetsDef,
        #[serde(default = "default_region")]
        region: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subregions: Option<Vec<String>>,
        #[serde(default)]
        components: RegionComponentsDef,
        #[serde(default = "default_method")]
        method: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weight: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        drop_negative_weights: Option<bool>,
    },
    Time {
        variable: TargetsDef,
        #[serde(default = "default_column")]
        column: String,
        #[serde(default = "default_value")]
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        components: Option<Vec<String>>,
        #[serde(default = "default_method")]
        method: String,
    },
    /// Every variable against its components and subregions.
    Consistency {
        #[serde(default)]
        components: bool,
    },
}

fn default_method() -> String {
    "sum".to_string()
}

fn default_region() -> String {
    "World".to_string()
}

fn default_column() -> String {
    "subannual".to_string()
}

fn default_value() -> String {
    "year".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TargetsDef {
    One(String),
    Many(Vec<String>),
}

impl TargetsDef {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            TargetsDef::One(v) => vec![v.clone()],
            TargetsDef::Many(vs) => vs.clone(),
        }
    }
}

/// `true`, `false` or `"skip-validate"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RecursiveDef {
    Flag(bool),
    Mode(String),
}

impl Default for RecursiveDef {
    fn default() -> Self {
        RecursiveDef::Flag(false)
    }
}

impl RecursiveDef {
    /// Canonical token of the mode, if it is a known one.
    pub fn token(&self) -> Option<&str> {
        match self {
            RecursiveDef::Flag(true) => Some("true"),
            RecursiveDef::Flag(false) => Some("false"),
            RecursiveDef::Mode(mode) => match mode.as_str() {
                "true" | "false" | "skip-validate" => Some(mode.as_str()),
                _ => None,
            },
        }
    }
}

/// `true` for region-level components inferred from the data, or an
/// explicit list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RegionComponentsDef {
    Flag(bool),
    Explicit(ComponentsArg),
}

impl Default for RegionComponentsDef {
    fn default() -> Self {
        RegionComponentsDef::Flag(false)
    }
}
