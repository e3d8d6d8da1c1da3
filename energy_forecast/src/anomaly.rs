//! Outlier detection over a whole consumption series
//!
//! Both methods look at the full sequence at once (no rolling window).

use crate::error::{ForecastError, Result};
use energy_math::round_half_up;
use energy_math::statistics::{mean, population_std_dev, rank_value, sorted_copy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Fewest values either method will look at
pub const MIN_ANOMALY_INPUT: usize = 3;

/// z-scores above this are `High` severity
const HIGH_Z: f64 = 3.0;

/// Detection method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyMethod {
    /// Distance from the mean in population standard deviations
    #[default]
    ZScore,
    /// Outside the Tukey fences `Q1 - 1.5·IQR`, `Q3 + 1.5·IQR`
    Iqr,
}

impl FromStr for AnomalyMethod {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "zscore" | "z-score" | "z" => Ok(AnomalyMethod::ZScore),
            "iqr" => Ok(AnomalyMethod::Iqr),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unknown anomaly method: {}",
                other
            ))),
        }
    }
}

/// Severity label
///
/// For the IQR method `Low` and `High` mean below and above the fences,
/// not intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A flagged observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    /// Position in the input sequence
    pub index: usize,
    pub value: f64,
    /// Absolute z-score rounded to two decimals, z-score method only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_score: Option<f64>,
    pub severity: Severity,
}

/// Flag outliers in `values`
///
/// Fewer than three values, or a series with zero spread, yields nothing.
pub fn detect_anomalies(values: &[f64], method: AnomalyMethod, threshold: f64) -> Vec<Anomaly> {
    if values.len() < MIN_ANOMALY_INPUT {
        return Vec::new();
    }

    match method {
        AnomalyMethod::ZScore => zscore_anomalies(values, threshold),
        AnomalyMethod::Iqr => iqr_anomalies(values),
    }
}

fn zscore_anomalies(values: &[f64], threshold: f64) -> Vec<Anomaly> {
    let (Ok(center), Ok(std_dev)) = (mean(values), population_std_dev(values)) else {
        return Vec::new();
    };
    if std_dev <= 0.0 || !std_dev.is_finite() {
        warn!(
            len = values.len(),
            std_dev, "series has no usable spread, skipping z-score detection"
        );
        return Vec::new();
    }

    values
        .iter()
        .enumerate()
        .filter_map(|(index, &value)| {
            let z = ((value - center) / std_dev).abs();
            (z > threshold).then(|| Anomaly {
                index,
                value,
                z_score: Some(round_half_up(z, 2)),
                severity: if z > HIGH_Z {
                    Severity::High
                } else {
                    Severity::Medium
                },
            })
        })
        .collect()
}

fn iqr_anomalies(values: &[f64]) -> Vec<Anomaly> {
    let sorted = sorted_copy(values);
    let (Ok(q1), Ok(q3)) = (rank_value(&sorted, 0.25), rank_value(&sorted, 0.75)) else {
        return Vec::new();
    };
    let iqr = q3 - q1;
    let lower = q1 - 1.5 * iqr;
    let upper = q3 + 1.5 * iqr;

    values
        .iter()
        .enumerate()
        .filter(|&(_, &value)| value < lower || value > upper)
        .map(|(index, &value)| Anomaly {
            index,
            value,
            z_score: None,
            severity: if value < lower {
                Severity::Low
            } else {
                Severity::High
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input_is_never_anomalous() {
        assert!(detect_anomalies(&[], AnomalyMethod::ZScore, 2.5).is_empty());
        assert!(detect_anomalies(&[1.0, 1000.0], AnomalyMethod::ZScore, 0.1).is_empty());
        assert!(detect_anomalies(&[1.0, 1000.0], AnomalyMethod::Iqr, 0.1).is_empty());
    }

    #[test]
    fn test_constant_series_has_no_anomalies() {
        assert!(detect_anomalies(&[42.0; 10], AnomalyMethod::ZScore, 0.5).is_empty());
    }

    #[test]
    fn test_zscore_flags_spike() {
        let values = [
            50.0, 52.0, 49.0, 51.0, 50.0, 48.0, 50.0, 51.0, 49.0, 52.0, 50.0, 200.0,
        ];
        let found = detect_anomalies(&values, AnomalyMethod::ZScore, 2.5);

        // mean 62.67, population std dev 41.42, z = 137.33 / 41.42 = 3.315
        assert_eq!(
            found,
            vec![Anomaly {
                index: 11,
                value: 200.0,
                z_score: Some(3.32),
                severity: Severity::High,
            }]
        );
    }

    #[test]
    fn test_zscore_cannot_exceed_sqrt_n_minus_one() {
        // With six points the largest possible population z-score is sqrt(5) = 2.236
        let values = [50.0, 52.0, 49.0, 51.0, 50.0, 200.0];
        assert!(detect_anomalies(&values, AnomalyMethod::ZScore, 2.5).is_empty());

        let found = detect_anomalies(&values, AnomalyMethod::ZScore, 2.0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].index, 5);
        assert_eq!(found[0].z_score, Some(2.24));
        assert_eq!(found[0].severity, Severity::Medium);
    }

    #[test]
    fn test_iqr_fences() {
        // sorted: 1, 10, 11, 12, 13, 14, 15, 100 -> Q1 = s[2] = 11, Q3 = s[6] = 15
        // fences: 5 and 21
        let values = [12.0, 1.0, 13.0, 10.0, 100.0, 14.0, 11.0, 15.0];
        let found = detect_anomalies(&values, AnomalyMethod::Iqr, 0.0);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].index, 1);
        assert_eq!(found[0].severity, Severity::Low);
        assert_eq!(found[0].z_score, None);
        assert_eq!(found[1].index, 4);
        assert_eq!(found[1].severity, Severity::High);
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("zscore".parse::<AnomalyMethod>().unwrap(), AnomalyMethod::ZScore);
        assert_eq!("IQR".parse::<AnomalyMethod>().unwrap(), AnomalyMethod::Iqr);
        assert!("mad".parse::<AnomalyMethod>().is_err());
    }
}
