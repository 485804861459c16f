use chrono::NaiveDate;

use crate::commands::base_commands::{DEFAULT_DURATION, HistoryArgs};
use crate::commands::command_error::{CommandError, parse_cli_date};
use crate::domain::work_item::WorkItemTable;
use crate::services::forecast_config::ForecastConfigFile;
use crate::services::record_cleaner::CleaningConfig;
use crate::services::work_item_file::load_work_items;

/// Inputs shared by every command that reads work item history.
pub struct LoadedHistory {
    pub config: ForecastConfigFile,
    pub table: WorkItemTable,
    pub cleaning: CleaningConfig,
    pub duration: String,
    pub as_of: NaiveDate,
}

pub fn load_history(args: &HistoryArgs) -> Result<LoadedHistory, CommandError> {
    let config = ForecastConfigFile::load_optional(args.config.as_deref())?;
    let cleaning =
        config.cleaning_config(args.start_column.as_deref(), args.end_column.as_deref())?;
    let as_of = parse_cli_date("as-of", &args.as_of)?;
    let duration = args
        .duration
        .clone()
        .or_else(|| config.duration.clone())
        .unwrap_or_else(|| DEFAULT_DURATION.to_string());
    let table = load_work_items(&args.file)?;

    Ok(LoadedHistory {
        config,
        table,
        cleaning,
        duration,
        as_of,
    })
}
