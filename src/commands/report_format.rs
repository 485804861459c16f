use crate::domain::throughput::DistributionRow;
use crate::services::forecast_types::{ForecastOutput, HowManyPercentile, WhenPercentile};

pub fn format_forecast_report(output: &ForecastOutput) -> String {
    let summary = &output.summary;
    let report = &output.report;
    let statistics = &report.statistics;

    let mut lines = Vec::new();
    lines.push("Forecast Report".to_string());
    lines.push(format!(
        "Historical window: {} ({})",
        summary.historical_window, summary.duration_policy
    ));
    lines.push(format!(
        "Finished items in window: {} over {} days",
        summary.finished_items, summary.historical_days
    ));
    lines.push(format!(
        "Simulation window: {} ({} days)",
        summary.simulation_window, summary.simulation_days
    ));
    lines.push(format!("Iterations: {}", summary.iterations));
    lines.push(format!("Items to complete: {}", summary.items_to_simulate));
    lines.push(format!("Max entries per day: {}", summary.max_entries_per_day));
    lines.push(String::new());
    lines.push(format!(
        "How many items will be done in {} days?",
        summary.simulation_days
    ));
    lines.push("Confidence | Items".to_string());
    lines.push("-----------|------".to_string());
    lines.extend(report.how_many.iter().map(format_how_many_row));
    lines.push(String::new());
    lines.push(format!(
        "When will {} items be done?",
        summary.items_to_simulate
    ));
    lines.push("Confidence | Days | Date".to_string());
    lines.push("-----------|------|-----".to_string());
    lines.extend(report.when.iter().map(format_when_row));
    lines.push(String::new());
    lines.push("Statistics:".to_string());
    lines.push(format!(
        "Mean items completed: {:.2}",
        statistics.mean_items_completed
    ));
    lines.push(format!(
        "Mode items completed: {}",
        statistics.mode_items_completed
    ));
    lines.push(format!(
        "Mean completion: {} ({:.2} days)",
        statistics.mean_completion_date, statistics.mean_days_to_complete
    ));
    lines.push(format!(
        "Mode completion: {} ({} days)",
        statistics.mode_completion_date, statistics.mode_days_to_complete
    ));
    lines.push(String::new());
    lines.push("Assumptions:".to_string());
    lines.extend(output.assumptions.iter().map(|a| format!("- {a}")));

    lines.join("\n")
}

pub fn format_distribution_table(historical_window: &str, rows: &[DistributionRow]) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Historical window: {historical_window}"));
    lines.push("Items per day | Probability".to_string());
    lines.push("--------------|------------".to_string());
    lines.extend(
        rows.iter()
            .map(|row| format!("{} | {}", row.count, row.percentage)),
    );
    lines.join("\n")
}

fn format_how_many_row(percentile: &HowManyPercentile) -> String {
    format!(
        "{} | {:.2}",
        format_confidence(percentile.confidence),
        percentile.items
    )
}

fn format_when_row(percentile: &WhenPercentile) -> String {
    format!(
        "{} | {:.2} | {}",
        format_confidence(percentile.confidence),
        percentile.days,
        percentile.date
    )
}

fn format_confidence(level: f64) -> String {
    format!("{:.0}%", level * 100.0)
}
