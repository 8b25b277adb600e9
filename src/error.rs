//! Error types for fxcalc

use thiserror::Error;

/// Main error type for fxcalc operations
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("No rate available for {0}")]
    MissingRate(String),

    #[error("Rate fetch failed: {0}")]
    RateFetch(String),

    #[error("History is empty, nothing to export")]
    EmptyExport,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type alias for fxcalc operations
pub type Result<T> = std::result::Result<T, FxError>;
