use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::throughput::DistributionRow;

/// "At least `items` items complete by the simulation end with
/// `confidence` probability."
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HowManyPercentile {
    pub confidence: f64,
    pub items: f64,
}

/// "The target is complete within `days` days, on or before `date`, with
/// `confidence` probability."
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WhenPercentile {
    pub confidence: f64,
    pub days: f64,
    pub date: NaiveDate,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ForecastStatistics {
    pub mean_items_completed: f64,
    pub mode_items_completed: usize,
    pub mean_days_to_complete: f64,
    pub mean_completion_date: NaiveDate,
    pub mode_days_to_complete: usize,
    pub mode_completion_date: NaiveDate,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ForecastReport {
    pub simulation_start: NaiveDate,
    pub how_many: Vec<HowManyPercentile>,
    pub when: Vec<WhenPercentile>,
    pub statistics: ForecastStatistics,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub historical_window: String,
    pub duration_policy: String,
    pub simulation_window: String,
    pub simulation_days: usize,
    pub items_to_simulate: usize,
    pub max_entries_per_day: usize,
    pub finished_items: usize,
    pub historical_days: usize,
    pub iterations: usize,
}

/// How often a simulated value occurred. `date` is set for "when" outcomes.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OutcomeFrequency {
    pub value: usize,
    pub occurrences: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ForecastOutput {
    pub summary: RunSummary,
    pub assumptions: Vec<String>,
    pub throughput_distribution: Vec<DistributionRow>,
    pub report: ForecastReport,
    pub how_many_frequencies: Vec<OutcomeFrequency>,
    pub when_frequencies: Vec<OutcomeFrequency>,
}
