use thiserror::Error;
use serde::Serialize;

/// Crate-wide error type.
///
/// The detector and converter are total over `Option` and never produce one
/// of these; only the rate service surfaces errors, and of those only
/// `RateUnavailable` is fatal to callers. Everything else is recovered
/// internally and reflected in `RateResult` flags.
#[derive(Error, Debug, Clone, Serialize)]
pub enum AppError {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Network Error: {0}")]
    Network(String),

    #[error("Storage Error: {0}")]
    Storage(String),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Exchange rate unavailable: both rate APIs failed and no cached rate exists")]
    RateUnavailable,

    #[error("Unknown Error: {0}")]
    Unknown(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("Serialization error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
