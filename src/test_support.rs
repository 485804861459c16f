use chrono::NaiveDate;

use crate::domain::throughput::ThroughputDistribution;
use crate::domain::work_item::{CleanedRecord, WorkItemRecord, WorkItemTable};
use crate::services::forecast_error::ForecastError;
use crate::services::monte_carlo::DailySampler;

// A mock DailySampler that repeats a fixed sequence of daily counts
pub struct FixedSampler {
    values: Vec<usize>,
}

impl FixedSampler {
    pub fn new(values: &[usize]) -> Self {
        Self {
            values: values.to_vec(),
        }
    }
}

impl DailySampler for FixedSampler {
    fn sample_days(
        &mut self,
        _distribution: &ThroughputDistribution,
        days: usize,
    ) -> Result<Vec<usize>, ForecastError> {
        Ok(self.values.iter().copied().cycle().take(days).collect())
    }
}

pub fn on_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn finished(id: &str, start: NaiveDate, end: NaiveDate) -> CleanedRecord {
    CleanedRecord {
        id: id.to_string(),
        start_date: start,
        end_date: Some(end),
    }
}

/// Builds a row with the `ID`, `InProgress` and `Done` columns the tests use.
pub fn work_item(id: &str, in_progress: &str, done: &str) -> WorkItemRecord {
    WorkItemRecord::new()
        .with_field("ID", id)
        .with_field("InProgress", in_progress)
        .with_field("Done", done)
}

pub fn table_of(rows: Vec<WorkItemRecord>) -> WorkItemTable {
    WorkItemTable::from_rows(rows)
}
