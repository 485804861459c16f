use chrono::NaiveDate;
use tracing::info;

use crate::domain::duration_policy::DurationPolicy;
use crate::domain::work_item::WorkItemTable;
use crate::services::forecast_aggregator::{
    DEFAULT_DISPLAY_PRECISION, DEFAULT_PERCENTILE_LEVELS, aggregate, outcome_frequencies,
};
use crate::services::forecast_error::ForecastError;
use crate::services::forecast_types::{ForecastOutput, RunSummary};
use crate::services::monte_carlo::{
    self, DEFAULT_HORIZON_MULTIPLIER, DailySampler, RandomSampler, SimulationParameters,
};
use crate::services::record_cleaner::{self, CleaningConfig};
use crate::services::throughput_distribution::{self, finished_in_window};
use crate::services::window_selector;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub horizon_multiplier: usize,
    pub percentile_levels: Vec<f64>,
    pub display_precision: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            horizon_multiplier: DEFAULT_HORIZON_MULTIPLIER,
            percentile_levels: DEFAULT_PERCENTILE_LEVELS.to_vec(),
            display_precision: DEFAULT_DISPLAY_PRECISION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetItemCount {
    Fixed(usize),
    /// Use the number of items in progress on the as-of date.
    CurrentWorkInProgress,
}

impl TargetItemCount {
    /// `0` selects the current work in progress.
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            Self::CurrentWorkInProgress
        } else {
            Self::Fixed(count)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub cleaning: CleaningConfig,
    pub duration_policy: String,
    pub as_of: NaiveDate,
    pub target: TargetItemCount,
    pub simulation_start: NaiveDate,
    pub simulation_end: NaiveDate,
    pub iterations: usize,
    pub settings: EngineSettings,
}

impl ForecastRequest {
    /// Number of days in the simulation window, both ends included.
    pub fn simulation_days(&self) -> Result<usize, ForecastError> {
        if self.simulation_end < self.simulation_start {
            return Err(ForecastError::InvalidSimulationWindow {
                start_date: self.simulation_start,
                end_date: self.simulation_end,
            });
        }
        Ok((self.simulation_end - self.simulation_start).num_days() as usize + 1)
    }

    fn simulation_window_label(&self) -> String {
        format!(
            "{} - {}",
            self.simulation_start.format("%Y-%m-%d"),
            self.simulation_end.format("%Y-%m-%d")
        )
    }
}

/// Runs a forecast with a seeded sampler, or an entropy-seeded one when `seed`
/// is `None`.
pub fn run_forecast_with_seed(
    table: &WorkItemTable,
    request: &ForecastRequest,
    seed: Option<u64>,
) -> Result<ForecastOutput, ForecastError> {
    match seed {
        Some(seed) => run_forecast(table, request, &mut RandomSampler::seeded(seed)),
        None => run_forecast(table, request, &mut RandomSampler::from_entropy()),
    }
}

/// Clean, select the window, build the distribution, simulate, aggregate.
/// Stops at the first failing stage.
pub fn run_forecast<S: DailySampler + ?Sized>(
    table: &WorkItemTable,
    request: &ForecastRequest,
    sampler: &mut S,
) -> Result<ForecastOutput, ForecastError> {
    info!(
        rows = table.len(),
        duration = %request.duration_policy,
        iterations = request.iterations,
        "starting forecast"
    );

    let simulation_days = request.simulation_days()?;
    let cleaned = record_cleaner::clean(table, &request.cleaning)?;
    let target_item_count = resolve_target(table, request)?;
    let window = window_selector::select_window(&request.duration_policy, request.as_of, &cleaned)?;
    let distribution = throughput_distribution::build(&cleaned, &window)?;

    let parameters = SimulationParameters {
        iterations: request.iterations,
        simulation_days,
        target_item_count,
        horizon_multiplier: request.settings.horizon_multiplier,
    };
    let outcomes = monte_carlo::run(&distribution, &parameters, sampler)?;

    let report = aggregate(
        &outcomes.total_completed,
        &outcomes.days_elapsed,
        &request.settings.percentile_levels,
        request.simulation_start,
        request.settings.display_precision,
    )?;

    let summary = RunSummary {
        historical_window: window.label(),
        duration_policy: request.duration_policy.clone(),
        simulation_window: request.simulation_window_label(),
        simulation_days,
        items_to_simulate: target_item_count,
        max_entries_per_day: distribution.max_count(),
        finished_items: finished_in_window(&cleaned, &window).count(),
        historical_days: window.number_of_days(),
        iterations: outcomes.len(),
    };

    let output = ForecastOutput {
        summary,
        assumptions: assumptions(table, request),
        throughput_distribution: distribution.percentage_table(request.settings.display_precision),
        report,
        how_many_frequencies: outcome_frequencies(&outcomes.total_completed, None)?,
        when_frequencies: outcome_frequencies(
            &outcomes.days_elapsed,
            Some(request.simulation_start),
        )?,
    };

    info!(
        items = target_item_count,
        window = %output.summary.historical_window,
        "forecast complete"
    );
    Ok(output)
}

fn resolve_target(table: &WorkItemTable, request: &ForecastRequest) -> Result<usize, ForecastError> {
    let target = match request.target {
        TargetItemCount::Fixed(count) => count,
        TargetItemCount::CurrentWorkInProgress => {
            record_cleaner::count_in_progress(table, &request.cleaning, request.as_of)?
        }
    };
    if target == 0 {
        return Err(ForecastError::InvalidTargetCount);
    }
    Ok(target)
}

fn assumptions(table: &WorkItemTable, request: &ForecastRequest) -> Vec<String> {
    let mut assumptions = vec![
        "Simulation is built using throughput of completed items only (not in progress items)"
            .to_string(),
        "Assumes that the historical throughput will be consistent with future throughput"
            .to_string(),
        "Date range is inclusive of start and end date".to_string(),
    ];

    if let Some(policy) = DurationPolicy::from_name(&request.duration_policy) {
        assumptions.push(policy.describe());
    }

    match record_cleaner::cancellation_column(table, &request.cleaning) {
        Some(column) => assumptions.push(format!(
            "Cancelled items were excluded using the {column} column"
        )),
        None => assumptions
            .push("No cancellation column was found, so no items were excluded".to_string()),
    }

    if request.target == TargetItemCount::CurrentWorkInProgress {
        assumptions.push(format!(
            "Current in-progress items are ones that started on or before {} and have not finished",
            request.as_of.format("%Y-%m-%d")
        ));
    }

    assumptions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedSampler, on_date, table_of, work_item};

    fn table() -> WorkItemTable {
        table_of(vec![
            work_item("A1", "2021-11-10", "2021-12-01").with_field("Cancelled", "Yes"),
            work_item("A2", "2021-10-02", "2021-11-01").with_field("Cancelled", ""),
            work_item("B1", "2021-12-15", "2021-12-20"),
            work_item("C3", "2021-05-01", "2022-01-05"),
            work_item("C4", "", ""),
            work_item("Z5", "2021-10-06", "2022-01-10"),
            work_item("Z6", "2021-12-02", "2022-02-10"),
            work_item("Z7", "2022-01-03", ""),
        ])
    }

    fn request(duration_policy: &str, target: TargetItemCount) -> ForecastRequest {
        ForecastRequest {
            cleaning: CleaningConfig::new("InProgress", "Done"),
            duration_policy: duration_policy.to_string(),
            as_of: on_date(2022, 1, 10),
            target,
            simulation_start: on_date(2022, 2, 14),
            simulation_end: on_date(2022, 2, 20),
            iterations: 4,
            settings: EngineSettings::default(),
        }
    }

    #[test]
    fn constant_throughput_produces_flat_forecast() {
        let mut sampler = FixedSampler::new(&[1]);
        let output = run_forecast(&table(), &request("All", TargetItemCount::Fixed(3)), &mut sampler)
            .unwrap();

        assert_eq!(output.summary.historical_window, "2021-11-01 - 2022-02-10");
        assert_eq!(output.summary.simulation_days, 7);
        assert_eq!(output.summary.finished_items, 5);
        assert_eq!(output.summary.historical_days, 102);
        assert_eq!(output.summary.max_entries_per_day, 1);
        assert_eq!(output.summary.iterations, 4);

        assert!(output.report.how_many.iter().all(|p| p.items == 7.0));
        assert!(output.report.when.iter().all(|p| p.days == 3.0));
        assert!(output.report.when.iter().all(|p| p.date == on_date(2022, 2, 17)));
        assert_eq!(output.report.statistics.mean_items_completed, 7.0);
        assert_eq!(output.report.statistics.mean_completion_date, on_date(2022, 2, 17));

        assert_eq!(output.when_frequencies.len(), 1);
        assert_eq!(output.when_frequencies[0].occurrences, 4);
        assert!(
            output
                .assumptions
                .contains(&"Cancelled items were excluded using the Cancelled column".to_string())
        );
    }

    #[test]
    fn zero_target_uses_current_work_in_progress() {
        let mut sampler = FixedSampler::new(&[1]);
        let output = run_forecast(
            &table(),
            &request("All", TargetItemCount::from_count(0)),
            &mut sampler,
        )
        .unwrap();

        assert_eq!(output.summary.items_to_simulate, 1);
        assert_eq!(output.report.statistics.mode_days_to_complete, 1);
        assert!(output.assumptions.iter().any(|a| a.starts_with("Current in-progress items")));
    }

    #[test]
    fn no_work_in_progress_is_an_invalid_target() {
        let mut request = request("All", TargetItemCount::CurrentWorkInProgress);
        request.as_of = on_date(2021, 1, 1);

        let error = run_forecast(&table(), &request, &mut FixedSampler::new(&[1])).unwrap_err();
        assert_eq!(error, ForecastError::InvalidTargetCount);
    }

    #[test]
    fn empty_window_stops_before_simulation() {
        let mut request = request("YTD", TargetItemCount::Fixed(3));
        request.as_of = on_date(2021, 6, 1);

        let error = run_forecast(&table(), &request, &mut FixedSampler::new(&[])).unwrap_err();
        assert_eq!(
            error,
            ForecastError::EmptyHistoricalWindow {
                start_date: on_date(2021, 11, 1),
                end_date: on_date(2021, 6, 1),
            }
        );
    }

    #[test]
    fn unsupported_policy_is_reported() {
        let error = run_forecast(
            &table(),
            &request("Last Fortnight", TargetItemCount::Fixed(3)),
            &mut FixedSampler::new(&[1]),
        )
        .unwrap_err();
        assert_eq!(
            error.to_string(),
            "unexpected historical duration received: Last Fortnight"
        );
    }

    #[test]
    fn reversed_simulation_window_is_rejected() {
        let mut request = request("All", TargetItemCount::Fixed(3));
        request.simulation_end = on_date(2022, 2, 1);

        let error = run_forecast(&table(), &request, &mut FixedSampler::new(&[1])).unwrap_err();
        assert!(matches!(error, ForecastError::InvalidSimulationWindow { .. }));
    }

    #[test]
    fn identical_seeds_produce_identical_reports() {
        let mut request = request("All", TargetItemCount::Fixed(2));
        request.simulation_end = on_date(2022, 4, 14);
        request.iterations = 500;

        let first = run_forecast_with_seed(&table(), &request, Some(11)).unwrap();
        let second = run_forecast_with_seed(&table(), &request, Some(11)).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_yaml::to_string(&first).unwrap(),
            serde_yaml::to_string(&second).unwrap()
        );
    }
}
