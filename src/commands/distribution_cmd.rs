use std::fs::File;
use std::io::{BufWriter, Write};
use std::process::ExitCode;

use crate::commands::base_commands::DistributionArgs;
use crate::commands::command_error::CommandError;
use crate::commands::history::load_history;
use crate::commands::report_format::format_distribution_table;
use crate::domain::throughput::DistributionRow;
use crate::services::forecast_aggregator::DEFAULT_DISPLAY_PRECISION;
use crate::services::throughput_yaml::serialize_distribution_to_yaml;
use crate::services::{record_cleaner, throughput_distribution, window_selector};

pub fn distribution_command(args: DistributionArgs) -> ExitCode {
    match run(&args) {
        Ok((window, rows)) => {
            println!("{}", format_distribution_table(&window, &rows));
            if let Some(output) = &args.output {
                println!("Throughput distribution written to {output}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to build throughput distribution: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &DistributionArgs) -> Result<(String, Vec<DistributionRow>), CommandError> {
    let history = load_history(&args.history)?;
    let cleaned = record_cleaner::clean(&history.table, &history.cleaning)?;
    let window = window_selector::select_window(&history.duration, history.as_of, &cleaned)?;
    let distribution = throughput_distribution::build(&cleaned, &window)?;
    let precision = history
        .config
        .display_precision
        .unwrap_or(DEFAULT_DISPLAY_PRECISION);
    let rows = distribution.percentage_table(precision);

    if let Some(path) = &args.output {
        let write_error = |source| CommandError::Write {
            path: path.clone(),
            source,
        };
        let file = File::create(path).map_err(write_error)?;
        let mut writer = BufWriter::new(file);
        let daily = throughput_distribution::daily_throughput(&cleaned, &window);
        serialize_distribution_to_yaml(&mut writer, &window, &daily, &rows).map_err(write_error)?;
        writer.flush().map_err(write_error)?;
    }

    Ok((window.label(), rows))
}
