//! Error types for aggregation and validation.

use ia_hierarchy::HierarchyError;
use ia_store::StoreError;
use thiserror::Error;

/// Errors raised by aggregation operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggError {
    #[error("Invalid aggregation method: '{method}'")]
    InvalidMethod { method: String },

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error("Aggregating by list of variables does not support `components`!")]
    ListWithComponents,

    #[error("Using weights and components in one operation not supported!")]
    WeightWithComponents,

    #[error("Only method 'sum' allowed for weighted average, found '{method}'")]
    WeightRequiresSum { method: String },

    #[error("Dropping negative weights can only be used with `weights`!")]
    DropNegativeWithoutWeight,

    #[error("Recursive aggregation cannot take `components` as argument")]
    RecursiveWithComponents,

    #[error("Missing weights for the following data rows:\n{table}")]
    MissingWeights { table: String },

    #[error("Aggregated values are inconsistent with existing data:\n{table}")]
    Inconsistent { table: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Broad class of an `AggError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid parameter combination, raised before any data is read.
    Usage,
    /// Valid request the engine does not support.
    NotImplemented,
    /// The data cannot serve the request (e.g. missing weights).
    Data,
    /// Aggregates disagree with existing data.
    Consistency,
    Store,
}

impl AggError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AggError::InvalidMethod { .. }
            | AggError::Hierarchy(_)
            | AggError::WeightWithComponents
            | AggError::WeightRequiresSum { .. }
            | AggError::DropNegativeWithoutWeight
            | AggError::RecursiveWithComponents => ErrorKind::Usage,
            AggError::ListWithComponents => ErrorKind::NotImplemented,
            AggError::MissingWeights { .. } => ErrorKind::Data,
            AggError::Inconsistent { .. } => ErrorKind::Consistency,
            AggError::Store(_) => ErrorKind::Store,
        }
    }
}

pub type AggResult<T> = Result<T, AggError>;
