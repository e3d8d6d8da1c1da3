//! Utility functions for the energy_forecast crate

use crate::data::Granularity;
use chrono::{DateTime, Utc};

/// Days of history worth fetching for a forecast horizon: `max(30, 2 × days)`
pub fn history_window_days(forecast_days: usize) -> usize {
    (forecast_days * 2).max(30)
}

/// Timestamps the forecast steps refer to, one bucket after another
pub fn future_timestamps(
    last_timestamp: DateTime<Utc>,
    horizon: usize,
    granularity: Granularity,
) -> Vec<DateTime<Utc>> {
    let step = granularity.step();
    let mut timestamps = Vec::with_capacity(horizon);
    let mut current = last_timestamp;

    for _ in 0..horizon {
        current += step;
        timestamps.push(current);
    }

    timestamps
}
