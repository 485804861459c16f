use std::path::Path;
use std::process::ExitCode;

use crate::commands::base_commands::{DEFAULT_ITERATIONS, ForecastArgs};
use crate::commands::command_error::{CommandError, parse_cli_date};
use crate::commands::history::load_history;
use crate::commands::report_format::format_forecast_report;
use crate::services::forecast::{ForecastRequest, TargetItemCount, run_forecast_with_seed};
use crate::services::forecast_types::ForecastOutput;
use crate::services::work_item_file::is_json_path;

pub fn forecast_command(args: ForecastArgs) -> ExitCode {
    let output = match run(&args) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Failed to forecast: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", format_forecast_report(&output));
    println!(
        "Forecast for {} items written to {}",
        output.summary.items_to_simulate, args.output
    );
    ExitCode::SUCCESS
}

fn run(args: &ForecastArgs) -> Result<ForecastOutput, CommandError> {
    let simulation_start = parse_cli_date("start", &args.start_date)?;
    let simulation_end = parse_cli_date("end", &args.end_date)?;
    let history = load_history(&args.history)?;

    let request = ForecastRequest {
        cleaning: history.cleaning,
        duration_policy: history.duration,
        as_of: history.as_of,
        target: TargetItemCount::from_count(args.items),
        simulation_start,
        simulation_end,
        iterations: args
            .iterations
            .or(history.config.iterations)
            .unwrap_or(DEFAULT_ITERATIONS),
        settings: history
            .config
            .engine_settings(args.percentiles.clone(), args.horizon_multiplier),
    };

    let output = run_forecast_with_seed(&history.table, &request, args.seed)?;
    write_output(&args.output, &output)?;
    Ok(output)
}

fn write_output(path: &str, output: &ForecastOutput) -> Result<(), CommandError> {
    let contents = if is_json_path(Path::new(path)) {
        serde_json::to_string_pretty(output)?
    } else {
        serde_yaml::to_string(output)?
    };

    std::fs::write(path, contents).map_err(|source| CommandError::Write {
        path: path.to_string(),
        source,
    })
}
