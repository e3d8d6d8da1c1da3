//! Day-of-week consumption patterns and peak-day projection

use crate::data::Observation;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Average value per UTC weekday, Sunday = 0 through Saturday = 6
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DayPatterns {
    averages: [f64; 7],
}

impl DayPatterns {
    /// Bucket observations by weekday and average each bucket
    ///
    /// Weekdays with no observations average to 0.
    pub fn from_observations(observations: &[Observation]) -> Self {
        let mut sums = [0.0; 7];
        let mut counts = [0usize; 7];

        for obs in observations {
            let day = obs.timestamp.weekday().num_days_from_sunday() as usize;
            sums[day] += obs.value;
            counts[day] += 1;
        }

        let mut averages = [0.0; 7];
        for day in 0..7 {
            if counts[day] > 0 {
                averages[day] = sums[day] / counts[day] as f64;
            }
        }
        Self { averages }
    }

    pub fn averages(&self) -> &[f64; 7] {
        &self.averages
    }

    /// Weekday with the highest positive average
    ///
    /// Ties go to the earlier weekday. When no weekday averages above zero,
    /// `fallback` is returned.
    pub fn peak_day(&self, fallback: u32) -> u32 {
        let mut best = fallback;
        let mut best_avg = 0.0;
        for (day, &avg) in self.averages.iter().enumerate() {
            if avg > best_avg {
                best_avg = avg;
                best = day as u32;
            }
        }
        best
    }
}

impl Serialize for DayPatterns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        for (day, avg) in self.averages.iter().enumerate() {
            map.serialize_entry(&day.to_string(), avg)?;
        }
        map.end()
    }
}

/// Date of the next occurrence of the peak weekday strictly after `today`
///
/// When today is itself the peak weekday the projection is a week out.
pub fn next_peak_date(patterns: &DayPatterns, today: DateTime<Utc>) -> NaiveDate {
    let today_index = today.weekday().num_days_from_sunday();
    let peak = patterns.peak_day(today_index);

    let mut days_until = (peak + 7 - today_index) % 7;
    if days_until == 0 {
        days_until = 7;
    }

    (today + Duration::days(days_until as i64)).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_timestamp;

    fn obs(date: &str, value: f64) -> Observation {
        Observation::new(parse_timestamp(date).unwrap(), value)
    }

    #[test]
    fn test_weekday_buckets() {
        // 2024-03-03 is a Sunday
        let data = vec![
            obs("2024-03-03", 10.0),
            obs("2024-03-10", 20.0),
            obs("2024-03-04", 7.0),
            obs("2024-03-09", 3.0),
        ];
        let patterns = DayPatterns::from_observations(&data);

        assert_eq!(patterns.averages(), &[15.0, 7.0, 0.0, 0.0, 0.0, 0.0, 3.0]);
        assert_eq!(patterns.peak_day(4), 0);
    }

    #[test]
    fn test_peak_falls_back_when_all_zero() {
        let patterns = DayPatterns::default();
        assert_eq!(patterns.peak_day(3), 3);
    }

    #[test]
    fn test_next_peak_is_never_today() {
        // Sunday peak, today is Sunday 2024-03-17
        let patterns = DayPatterns::from_observations(&[obs("2024-03-03", 10.0)]);
        let today = parse_timestamp("2024-03-17T15:00:00Z").unwrap();
        assert_eq!(
            next_peak_date(&patterns, today),
            NaiveDate::from_ymd_opt(2024, 3, 24).unwrap()
        );
    }

    #[test]
    fn test_next_peak_later_this_week() {
        // Friday peak, today is Tuesday 2024-03-12
        let patterns = DayPatterns::from_observations(&[
            obs("2024-03-08", 900.0),
            obs("2024-03-05", 100.0),
        ]);
        let today = parse_timestamp("2024-03-12T09:00:00Z").unwrap();
        assert_eq!(
            next_peak_date(&patterns, today),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn test_serializes_as_string_keyed_object() {
        let patterns = DayPatterns::from_observations(&[obs("2024-03-04", 7.5)]);
        let json = serde_json::to_value(patterns).unwrap();
        assert_eq!(json["1"], 7.5);
        assert_eq!(json["0"], 0.0);
        assert_eq!(json.as_object().unwrap().len(), 7);
    }
}
