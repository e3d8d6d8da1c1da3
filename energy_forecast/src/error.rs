//! Error types for the energy_forecast crate

use energy_math::MathError;
use thiserror::Error;

/// Custom error types for the energy_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or record normalization
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// No observations to work with
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Observations exist but none of them can drive a model
    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),

    /// Error from numeric primitives
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error while reading CSV input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error while reading or writing JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error while loading configuration
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
