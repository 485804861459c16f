use chrono::NaiveDate;
use thiserror::Error;

/// Everything that can stop a forecast request. Each variant's message is
/// meant to be shown to the caller as-is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("no entries after removing cancelled and not-started entries")]
    NoUsableRecords,
    #[error("no entries completed between {start_date} and {end_date}")]
    EmptyHistoricalWindow {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    #[error("unexpected historical duration received: {0}")]
    UnsupportedDurationPolicy(String),
    #[error(
        "reached the end of {horizon_days} simulated days before completing {target} items"
    )]
    SimulationHorizonExceeded { target: usize, horizon_days: usize },
    #[error("column not found in work items: {0}")]
    MissingColumn(String),
    #[error("iterations must be greater than zero")]
    InvalidIterations,
    #[error("number of items to complete must be greater than zero")]
    InvalidTargetCount,
    #[error("simulation must cover at least one day")]
    InvalidSimulationDays,
    #[error("simulation end date {end_date} is before start date {start_date}")]
    InvalidSimulationWindow {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    #[error("horizon multiplier must be at least 1")]
    InvalidHorizonMultiplier,
    #[error("percentile level {0} is outside 0..=1")]
    InvalidPercentile(f64),
    #[error("throughput distribution cannot be sampled: {0}")]
    InvalidDistribution(String),
    #[error("cannot build the {policy} window for {as_of}: date out of range")]
    WindowOutOfRange { policy: String, as_of: NaiveDate },
    #[error("date {days} days after {start_date} is out of range")]
    DateOutOfRange { start_date: NaiveDate, days: usize },
}
