//! Linear trend estimation over a consumption series

use energy_math::{LinearRegression, MathError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Least-squares line through the series, x = zero-based index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

/// Direction label derived from the slope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    /// Classify a slope
    ///
    /// Slopes whose magnitude is at most `tolerance × |mean|` per step are
    /// `Stable`. A tolerance of zero gives the plain sign rule.
    pub fn classify(slope: f64, mean: f64, tolerance: f64) -> Self {
        let band = tolerance.max(0.0) * mean.abs();
        if slope > band {
            TrendDirection::Increasing
        } else if slope < -band {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fit a linear trend
///
/// An empty series has slope 0 and intercept 0; a single value is a flat
/// line through that value.
pub fn linear_trend(values: &[f64]) -> TrendLine {
    let regression = LinearRegression::from_values(values);
    match regression.fit() {
        Ok(fit) => {
            debug!(
                len = values.len(),
                slope = fit.slope,
                r_squared = ?regression.r_squared().ok(),
                "fitted trend line"
            );
            TrendLine {
                slope: fit.slope,
                intercept: fit.intercept,
            }
        }
        Err(MathError::InsufficientData(_)) => TrendLine {
            slope: 0.0,
            intercept: values.first().copied().unwrap_or(0.0),
        },
        Err(err) => {
            debug!(%err, len = values.len(), "trend fit failed, treating as flat");
            TrendLine {
                slope: 0.0,
                intercept: values.iter().sum::<f64>() / values.len().max(1) as f64,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_constant_series_is_flat() {
        let line = linear_trend(&[250.0; 12]);
        assert_eq!(line.slope, 0.0);
        assert_eq!(line.intercept, 250.0);
    }

    #[test]
    fn test_rising_series() {
        let line = linear_trend(&[100.0, 110.0, 120.0, 130.0]);
        assert_relative_eq!(line.slope, 10.0, epsilon = 1e-9);
        assert_relative_eq!(line.intercept, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(
            linear_trend(&[]),
            TrendLine {
                slope: 0.0,
                intercept: 0.0
            }
        );
        assert_eq!(
            linear_trend(&[5000.0]),
            TrendLine {
                slope: 0.0,
                intercept: 5000.0
            }
        );
    }

    #[rstest]
    #[case(5.0, 1000.0, 0.0, TrendDirection::Increasing)]
    #[case(-5.0, 1000.0, 0.0, TrendDirection::Decreasing)]
    #[case(0.0, 1000.0, 0.0, TrendDirection::Stable)]
    #[case(0.5, 1000.0, 0.001, TrendDirection::Stable)]
    #[case(-3.9, 10_000.0, 0.001, TrendDirection::Stable)]
    #[case(11.0, 10_000.0, 0.001, TrendDirection::Increasing)]
    fn test_classify(
        #[case] slope: f64,
        #[case] mean: f64,
        #[case] tolerance: f64,
        #[case] expected: TrendDirection,
    ) {
        assert_eq!(TrendDirection::classify(slope, mean, tolerance), expected);
    }
}
