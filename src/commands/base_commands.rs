use chrono::{Days, Local};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

pub const DEFAULT_DURATION: &str = "All";
pub const DEFAULT_ITERATIONS: usize = 10000;
pub const DEFAULT_SIMULATION_LENGTH_DAYS: u64 = 70;

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    /// Log pipeline details to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Forecast how many items finish by a date and when a number of items finish
    Forecast(ForecastArgs),
    /// Show the historical daily throughput distribution without simulating
    Distribution(DistributionArgs),
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Where the history comes from and which part of it to use.
#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Work item file (YAML, or JSON with a .json extension)
    #[arg(short = 'f', long)]
    pub file: String,
    /// Optional forecast config YAML
    #[arg(short, long)]
    pub config: Option<String>,
    /// Column holding the date work started
    #[arg(long)]
    pub start_column: Option<String>,
    /// Column holding the date work finished
    #[arg(long)]
    pub end_column: Option<String>,
    /// Historical duration: All, Last N Days, Last 10 Weeks, Last Calendar Year, YTD, ...
    #[arg(short, long)]
    pub duration: Option<String>,
    /// Reference date for calendar durations and in-progress items (YYYY-MM-DD)
    #[arg(long, default_value_t = default_start_date())]
    pub as_of: String,
}

#[derive(Args, Debug, Clone)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub history: HistoryArgs,
    /// Output file (YAML, or JSON with a .json extension)
    #[arg(short, long)]
    pub output: String,
    /// Number of items to complete (0 uses the number of items in progress)
    #[arg(short = 'n', long)]
    pub items: usize,
    /// Simulation start date (YYYY-MM-DD)
    #[arg(short, long, default_value_t = default_start_date())]
    pub start_date: String,
    /// Simulation end date (YYYY-MM-DD)
    #[arg(short, long, default_value_t = default_end_date())]
    pub end_date: String,
    /// Number of simulation iterations
    #[arg(short, long)]
    pub iterations: Option<usize>,
    /// Confidence levels between 0 and 1, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub percentiles: Option<Vec<f64>>,
    /// Oversampling factor for the "when" horizon
    #[arg(long)]
    pub horizon_multiplier: Option<usize>,
    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct DistributionArgs {
    #[command(flatten)]
    pub history: HistoryArgs,
    /// Optional YAML file for the daily throughput and distribution
    #[arg(short, long)]
    pub output: Option<String>,
}

fn default_start_date() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn default_end_date() -> String {
    let today = Local::now().date_naive();
    today
        .checked_add_days(Days::new(DEFAULT_SIMULATION_LENGTH_DAYS))
        .unwrap_or(today)
        .format("%Y-%m-%d")
        .to_string()
}
