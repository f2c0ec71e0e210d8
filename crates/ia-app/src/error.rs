//! Error types for the ia-app service layer.

use std::path::PathBuf;

use ia_aggregate::AggError;
use ia_config::ConfigError;
use ia_hierarchy::HierarchyError;
use ia_store::StoreError;

/// Application error type shared by every frontend.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read data file: {path}")]
    DataFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write data file: {path}")]
    DataFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed record on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Aggregation(#[from] AggError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Region mapping error: {0}")]
    Regions(#[from] HierarchyError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ia-app operations.
pub type AppResult<T> = Result<T, AppError>;
