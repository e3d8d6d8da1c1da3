//! # Energy Math
//!
//! Numeric building blocks for energy consumption analytics.
//! This crate provides the descriptive statistics, least-squares fitting and
//! display rounding shared by the forecasting and anomaly detection code.

use thiserror::Error;

pub mod regression;
pub mod rounding;
pub mod statistics;

pub use regression::{LinearFit, LinearRegression};
pub use rounding::{round_half_up, round_to_tenth};

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_cause() {
        let err = MathError::InsufficientData("need 2 points".to_string());
        assert_eq!(
            err.to_string(),
            "Insufficient data for calculation: need 2 points"
        );
    }
}
