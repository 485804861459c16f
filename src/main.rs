use std::process::ExitCode;

use clap::Parser;
use throughput_forecast::commands::base_commands::{CliArgs, Commands};
use throughput_forecast::commands::completions_cmd::completions_command;
use throughput_forecast::commands::distribution_cmd::distribution_command;
use throughput_forecast::commands::forecast_cmd::forecast_command;
use throughput_forecast::logging::init_tracing;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Forecast(forecast) => forecast_command(forecast),
        Commands::Distribution(distribution) => distribution_command(distribution),
        Commands::Completions { shell } => {
            completions_command(shell);
            ExitCode::SUCCESS
        }
    }
}
