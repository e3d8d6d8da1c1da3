//! Descriptive statistics over plain slices
//!
//! Everything here uses population (divide by `n`) moments.

use crate::{MathError, Result};

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot calculate mean of an empty series".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance about a known center
pub fn variance_about(values: &[f64], center: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot calculate variance of an empty series".to_string(),
        ));
    }

    let sum_sq: f64 = values
        .iter()
        .map(|&v| {
            let diff = v - center;
            diff * diff
        })
        .sum();

    Ok(sum_sq / values.len() as f64)
}

/// Population standard deviation
pub fn population_std_dev(values: &[f64]) -> Result<f64> {
    let center = mean(values)?;
    Ok(variance_about(values, center)?.sqrt())
}

/// Mean and population standard deviation of a set of absolute errors
///
/// The deviation is taken about the mean error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorSpread {
    pub mean: f64,
    pub std_dev: f64,
}

impl ErrorSpread {
    pub fn from_errors(errors: &[f64]) -> Result<Self> {
        let mean = mean(errors)?;
        let std_dev = variance_about(errors, mean)?.sqrt();
        Ok(Self { mean, std_dev })
    }
}

/// Value at `floor(len * fraction)` of an ascending-sorted slice
///
/// This is the nearest-rank style lookup used for quartiles, not an
/// interpolated percentile.
pub fn rank_value(sorted: &[f64], fraction: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take a rank value of an empty series".to_string(),
        ));
    }
    if !(0.0..1.0).contains(&fraction) {
        return Err(MathError::InvalidInput(format!(
            "Rank fraction must be in [0, 1), got {}",
            fraction
        )));
    }

    let index = (sorted.len() as f64 * fraction).floor() as usize;
    Ok(sorted[index.min(sorted.len() - 1)])
}

/// Sorted copy of a series, NaN values ordered last
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}
