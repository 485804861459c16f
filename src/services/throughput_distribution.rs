use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::throughput::{Throughput, ThroughputDistribution};
use crate::domain::window::HistoricalWindow;
use crate::domain::work_item::CleanedRecord;
use crate::services::forecast_error::ForecastError;

/// Records whose end date falls inside `window`.
pub fn finished_in_window<'a>(
    records: &'a [CleanedRecord],
    window: &'a HistoricalWindow,
) -> impl Iterator<Item = &'a CleanedRecord> {
    records
        .iter()
        .filter(move |record| record.end_date.is_some_and(|end| window.contains(end)))
}

/// Completions per calendar day over the whole window. Days without a
/// completion are present with a count of 0.
pub fn daily_throughput(records: &[CleanedRecord], window: &HistoricalWindow) -> Vec<Throughput> {
    let mut completed_per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for end_date in finished_in_window(records, window).filter_map(|record| record.end_date) {
        *completed_per_day.entry(end_date).or_insert(0) += 1;
    }

    window
        .days()
        .map(|date| Throughput {
            date,
            completed_items: completed_per_day.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Builds the empirical daily-throughput distribution for `window`.
pub fn build(
    records: &[CleanedRecord],
    window: &HistoricalWindow,
) -> Result<ThroughputDistribution, ForecastError> {
    let empty_window = || ForecastError::EmptyHistoricalWindow {
        start_date: window.start_date(),
        end_date: window.end_date(),
    };

    let finished = finished_in_window(records, window).count();
    if finished == 0 {
        return Err(empty_window());
    }

    let daily = daily_throughput(records, window);
    let distribution =
        ThroughputDistribution::from_daily_throughput(&daily).ok_or_else(empty_window)?;

    debug!(
        finished,
        days = daily.len(),
        max_per_day = distribution.max_count(),
        "built throughput distribution"
    );
    Ok(distribution)
}
