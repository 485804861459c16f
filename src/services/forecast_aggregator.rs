use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use crate::services::forecast_error::ForecastError;
use crate::services::forecast_types::{
    ForecastReport, ForecastStatistics, HowManyPercentile, OutcomeFrequency, WhenPercentile,
};
use crate::services::percentiles::quantiles;

pub const DEFAULT_PERCENTILE_LEVELS: [f64; 4] = [0.95, 0.85, 0.70, 0.50];
pub const DEFAULT_DISPLAY_PRECISION: u32 = 2;

/// Reduces the raw outcome series of a run to percentile tables and summary
/// statistics.
///
/// "How many" percentiles use the complement convention: confidence `p` is the
/// `1 - p` quantile of the simulated totals, because being more confident in a
/// minimum count means a lower quantile. "When" percentiles are the direct `p`
/// quantile of the simulated day counts.
pub fn aggregate(
    total_completed: &[usize],
    days_elapsed: &[usize],
    percentile_levels: &[f64],
    simulation_start: NaiveDate,
    display_precision: u32,
) -> Result<ForecastReport, ForecastError> {
    if let Some(level) = percentile_levels
        .iter()
        .find(|level| !(0.0..=1.0).contains(*level))
    {
        return Err(ForecastError::InvalidPercentile(*level));
    }

    let complements: Vec<f64> = percentile_levels.iter().map(|level| 1.0 - level).collect();
    let how_many_values =
        quantiles(total_completed, &complements).ok_or(ForecastError::InvalidIterations)?;
    let when_values =
        quantiles(days_elapsed, percentile_levels).ok_or(ForecastError::InvalidIterations)?;

    let how_many = percentile_levels
        .iter()
        .zip(how_many_values)
        .map(|(confidence, items)| HowManyPercentile {
            confidence: *confidence,
            items: round_to(items, display_precision),
        })
        .collect();

    let when = percentile_levels
        .iter()
        .zip(when_values)
        .map(|(confidence, days)| {
            Ok(WhenPercentile {
                confidence: *confidence,
                days: round_to(days, display_precision),
                date: date_after(simulation_start, whole_days(days))?,
            })
        })
        .collect::<Result<Vec<_>, ForecastError>>()?;

    let statistics = statistics(
        total_completed,
        days_elapsed,
        simulation_start,
        display_precision,
    )?;

    Ok(ForecastReport {
        simulation_start,
        how_many,
        when,
        statistics,
    })
}

fn statistics(
    total_completed: &[usize],
    days_elapsed: &[usize],
    simulation_start: NaiveDate,
    display_precision: u32,
) -> Result<ForecastStatistics, ForecastError> {
    let mean_items = mean(total_completed).ok_or(ForecastError::InvalidIterations)?;
    let mode_items = mode(total_completed).ok_or(ForecastError::InvalidIterations)?;
    let mean_days = mean(days_elapsed).ok_or(ForecastError::InvalidIterations)?;
    let mode_days = mode(days_elapsed).ok_or(ForecastError::InvalidIterations)?;

    Ok(ForecastStatistics {
        mean_items_completed: round_to(mean_items, display_precision),
        mode_items_completed: mode_items,
        mean_days_to_complete: round_to(mean_days, display_precision),
        mean_completion_date: date_after(simulation_start, mean_days.round() as usize)?,
        mode_days_to_complete: mode_days,
        mode_completion_date: date_after(simulation_start, mode_days)?,
    })
}

pub fn mean(values: &[usize]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().map(|value| *value as f64).sum();
    Some(sum / values.len() as f64)
}

/// Most frequent value; ties go to the smallest value.
pub fn mode(values: &[usize]) -> Option<usize> {
    frequencies(values)
        .into_iter()
        .rev()
        .max_by_key(|(_, occurrences)| *occurrences)
        .map(|(value, _)| value)
}

pub fn frequencies(values: &[usize]) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(*value).or_insert(0usize) += 1;
    }
    counts
}

/// Value/occurrence pairs in ascending value order. When `simulation_start` is
/// given each value is also translated to a calendar date.
pub fn outcome_frequencies(
    values: &[usize],
    simulation_start: Option<NaiveDate>,
) -> Result<Vec<OutcomeFrequency>, ForecastError> {
    frequencies(values)
        .into_iter()
        .map(|(value, occurrences)| {
            let date = simulation_start
                .map(|start| date_after(start, value))
                .transpose()?;
            Ok(OutcomeFrequency {
                value,
                occurrences,
                date,
            })
        })
        .collect()
}

pub fn date_after(start_date: NaiveDate, days: usize) -> Result<NaiveDate, ForecastError> {
    start_date
        .checked_add_days(Days::new(days as u64))
        .ok_or(ForecastError::DateOutOfRange { start_date, days })
}

/// Whole days elapsed for a fractional quantile. Interpolation noise just
/// below an integer still counts as that integer.
fn whole_days(days: f64) -> usize {
    (days + 1e-9).floor() as usize
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}
