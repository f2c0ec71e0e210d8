//! ia-hierarchy: the two hierarchy dimensions of timeseries data.
//!
//! Provides:
//! - `VariableTree`, a trie over delimiter-separated variable names
//! - component resolution for a parent variable
//! - region mappings and subregion resolution
//!
//! # Example
//!
//! ```
//! use ia_hierarchy::VariableTree;
//!
//! let tree = VariableTree::from_variables(
//!     ["Primary Energy", "Primary Energy|Coal", "Primary Energy|Wind"],
//!     "|",
//! );
//! assert_eq!(
//!     tree.children("Primary Energy"),
//!     vec!["Primary Energy|Coal", "Primary Energy|Wind"]
//! );
//! ```

pub mod components;
pub mod error;
pub mod regions;
pub mod tree;

pub use components::{ComponentsArg, components_of};
pub use error::{HierarchyError, HierarchyResult};
pub use regions::{RegionMapping, subregions_of};
pub use tree::{DEFAULT_DELIMITER, VariableTree, validate_delimiter};
