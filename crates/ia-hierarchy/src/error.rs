//! Hierarchy error types.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// Components were given as a keyed mapping instead of a flat list.
    #[error("Value for `components` must be a list, found: {found}")]
    ComponentsNotList { found: String },

    #[error("Region '{region}' cannot be its own subregion")]
    SelfReference { region: String },

    #[error("Variable delimiter must not be empty")]
    EmptyDelimiter,
}

pub type HierarchyResult<T> = Result<T, HierarchyError>;
