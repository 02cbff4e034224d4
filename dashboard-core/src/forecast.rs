//! Reduces 3-hour forecast samples to one representative sample per day.

use chrono::NaiveDate;

use crate::model::{ForecastSample, ForecastSummary};

/// Hour of day a representative sample should be closest to.
pub const TARGET_HOUR: u32 = 12;

/// Maximum number of days in a summary.
pub const MAX_DAYS: usize = 5;

/// Pick the sample closest to noon for each calendar day, keeping days in
/// first-appearance order and returning at most [`MAX_DAYS`] of them.
///
/// Ties go to the first-seen sample.
pub fn summarize(samples: &[ForecastSample]) -> ForecastSummary {
    let mut days: Vec<(NaiveDate, &ForecastSample)> = Vec::new();

    for sample in samples {
        let date = sample.date();
        match days.iter_mut().find(|(day, _)| *day == date) {
            Some((_, best)) => {
                if distance_from_target(sample) < distance_from_target(best) {
                    *best = sample;
                }
            }
            None => days.push((date, sample)),
        }
    }

    days.into_iter().take(MAX_DAYS).map(|(_, best)| best.clone()).collect()
}

fn distance_from_target(sample: &ForecastSample) -> u32 {
    sample.hour().abs_diff(TARGET_HOUR)
}
