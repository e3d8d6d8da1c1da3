//! Least-squares line fitting over an index-ordered series
//!
//! The x coordinate of every value is its zero-based position, so the fitted
//! slope is expressed in value units per step (per day for daily totals).

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Ordinary least-squares fit `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Value of the fitted line at position `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Least-squares regression over an index-ordered series
///
/// Fitting needs at least two points. A series whose values are all
/// identical has a slope of exactly zero.
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    values: Vec<f64>,
}

impl LinearRegression {
    /// Create a regression over an existing series
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
        }
    }

    /// Calculate the slope and intercept
    pub fn fit(&self) -> Result<LinearFit> {
        if self.values.len() < 2 {
            return Err(MathError::InsufficientData(format!(
                "Linear regression needs at least 2 points, have {}",
                self.values.len()
            )));
        }

        let n = self.values.len() as f64;
        let x_mean = (self.values.len() - 1) as f64 / 2.0;
        let y_mean = self.values.iter().sum::<f64>() / n;

        // Flat series: slope is exactly zero
        let first = self.values[0];
        if self.values.iter().all(|&v| v == first) {
            return Ok(LinearFit {
                slope: 0.0,
                intercept: first,
            });
        }

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (i, &y) in self.values.iter().enumerate() {
            let x = i as f64;
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        Ok(LinearFit { slope, intercept })
    }

    /// Get the R-squared value (coefficient of determination)
    pub fn r_squared(&self) -> Result<f64> {
        let fit = self.fit()?;
        let y_mean = self.values.iter().sum::<f64>() / self.values.len() as f64;

        let mut ss_total = 0.0; // total sum of squares
        let mut ss_residual = 0.0; // residual sum of squares

        for (i, &y) in self.values.iter().enumerate() {
            let y_pred = fit.predict(i as f64);
            ss_total += (y - y_mean).powi(2);
            ss_residual += (y - y_pred).powi(2);
        }

        if ss_total.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate R-squared: total sum of squares is too small".to_string(),
            ));
        }

        Ok(1.0 - (ss_residual / ss_total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_line() {
        let fit = LinearRegression::from_values(&[10.0, 20.0, 30.0]).fit().unwrap();

        assert_relative_eq!(fit.slope, 10.0, epsilon = 1e-9);
        assert_relative_eq!(fit.intercept, 10.0, epsilon = 1e-9);
        assert_relative_eq!(fit.predict(3.0), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_constant_series_has_zero_slope() {
        let fit = LinearRegression::from_values(&[0.1; 9]).fit().unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 0.1);
    }

    #[test]
    fn test_needs_two_points() {
        assert!(matches!(
            LinearRegression::from_values(&[5.0]).fit(),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            LinearRegression::from_values(&[]).fit(),
            Err(MathError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_r_squared() {
        let line = LinearRegression::from_values(&[1.0, 3.0, 5.0, 7.0]);
        assert!(line.r_squared().unwrap() > 0.999);

        let noisy = LinearRegression::from_values(&[1.0, 4.0, 2.0, 5.0]);
        let r2 = noisy.r_squared().unwrap();
        assert!(r2 > 0.0 && r2 < 1.0);

        // A flat series has no variance to explain
        assert!(matches!(
            LinearRegression::from_values(&[3.0; 5]).r_squared(),
            Err(MathError::CalculationError(_))
        ));
    }
}
