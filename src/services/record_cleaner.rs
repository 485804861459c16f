use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::domain::work_item::{
    CleanedRecord, WorkItemRecord, WorkItemTable, normalize_column_name,
};
use crate::services::forecast_error::ForecastError;

pub const DEFAULT_ID_COLUMN: &str = "ID";
pub const DEFAULT_CANCELLATION_COLUMNS: [&str; 2] = ["Cancelled", "Resolution"];
pub const DEFAULT_CANCELLATION_VALUES: [&str; 2] = ["Yes", "Cancelled"];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Which columns hold the start and end dates, and how cancelled items are
/// recognised. Candidates are tried in order; the first column present in the
/// table is the one used for the whole table.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CleaningConfig {
    pub start_column: String,
    pub end_column: String,
    pub id_column: String,
    pub cancellation_column_candidates: Vec<String>,
    pub cancellation_values: Vec<String>,
}

impl CleaningConfig {
    pub fn new(start_column: &str, end_column: &str) -> Self {
        Self {
            start_column: start_column.to_string(),
            end_column: end_column.to_string(),
            id_column: DEFAULT_ID_COLUMN.to_string(),
            cancellation_column_candidates: DEFAULT_CANCELLATION_COLUMNS
                .iter()
                .map(|column| column.to_string())
                .collect(),
            cancellation_values: DEFAULT_CANCELLATION_VALUES
                .iter()
                .map(|value| value.to_string())
                .collect(),
        }
    }
}

struct ResolvedColumns<'a> {
    start: String,
    end: String,
    id: Option<String>,
    cancellation: Option<String>,
    cancellation_values: &'a [String],
}

impl<'a> ResolvedColumns<'a> {
    fn resolve(table: &WorkItemTable, config: &'a CleaningConfig) -> Result<Self, ForecastError> {
        for column in [&config.start_column, &config.end_column] {
            if !table.has_column(column) {
                return Err(ForecastError::MissingColumn(column.clone()));
            }
        }

        Ok(Self {
            start: normalize_column_name(&config.start_column),
            end: normalize_column_name(&config.end_column),
            id: Some(normalize_column_name(&config.id_column))
                .filter(|column| table.has_column(column)),
            cancellation: cancellation_column(table, config),
            cancellation_values: &config.cancellation_values,
        })
    }

    fn is_cancelled(&self, row: &WorkItemRecord) -> bool {
        let Some(column) = &self.cancellation else {
            return false;
        };
        let value = row.get(column).map(str::trim).unwrap_or("");
        self.cancellation_values
            .iter()
            .any(|cancelled| cancelled == value)
    }

    fn raw<'r>(&self, row: &'r WorkItemRecord, column: &str) -> &'r str {
        row.get(column).map(str::trim).unwrap_or("")
    }

    fn id(&self, index: usize, row: &WorkItemRecord) -> String {
        self.id
            .as_deref()
            .map(|column| self.raw(row, column))
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("row {}", index + 1))
    }

    fn clean_row(&self, index: usize, row: &WorkItemRecord) -> Option<CleanedRecord> {
        let start = self.raw(row, &self.start);
        let end = self.raw(row, &self.end);
        if start.is_empty() || end.is_empty() {
            return None;
        }

        Some(CleanedRecord {
            id: self.id(index, row),
            start_date: parse_date(start)?,
            end_date: parse_date(end),
        })
    }
}

/// Returns the cancellation column that applies to `table`, if any.
pub fn cancellation_column(table: &WorkItemTable, config: &CleaningConfig) -> Option<String> {
    config
        .cancellation_column_candidates
        .iter()
        .map(|column| normalize_column_name(column))
        .find(|column| table.has_column(column))
}

/// Drops cancelled rows and rows whose start or end column is blank, and parses
/// the date columns. A start date that does not parse drops the row; an end
/// date that does not parse is kept as `None`.
pub fn clean(
    table: &WorkItemTable,
    config: &CleaningConfig,
) -> Result<Vec<CleanedRecord>, ForecastError> {
    let columns = ResolvedColumns::resolve(table, config)?;

    let mut cancelled = 0;
    let mut cleaned = Vec::with_capacity(table.len());
    for (index, row) in table.rows.iter().enumerate() {
        if columns.is_cancelled(row) {
            cancelled += 1;
            continue;
        }
        if let Some(record) = columns.clean_row(index, row) {
            cleaned.push(record);
        }
    }

    debug!(
        rows = table.len(),
        cancelled,
        kept = cleaned.len(),
        cancellation_column = columns.cancellation.as_deref().unwrap_or("none"),
        "cleaned work items"
    );

    if cleaned.is_empty() {
        return Err(ForecastError::NoUsableRecords);
    }
    Ok(cleaned)
}

/// Counts items that are in progress on `as_of`: not cancelled, started on or
/// before `as_of`, and without a parseable end date.
pub fn count_in_progress(
    table: &WorkItemTable,
    config: &CleaningConfig,
    as_of: NaiveDate,
) -> Result<usize, ForecastError> {
    let columns = ResolvedColumns::resolve(table, config)?;

    let in_progress = table
        .rows
        .iter()
        .filter(|row| !columns.is_cancelled(row))
        .filter(|row| {
            parse_date(columns.raw(row, &columns.start)).is_some_and(|start| start <= as_of)
        })
        .filter(|row| parse_date(columns.raw(row, &columns.end)).is_none())
        .count();

    debug!(in_progress, %as_of, "counted items in progress");
    Ok(in_progress)
}

/// Parses a calendar date, accepting a few common layouts and ignoring any
/// time-of-day part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|date_time| date_time.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
                .ok()
                .map(|date_time| date_time.date_naive())
        })
}
