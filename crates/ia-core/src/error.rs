use thiserror::Error;

pub type IaResult<T> = Result<T, IaError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IaError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid time point: '{input}'")]
    InvalidTime { input: String },
}
