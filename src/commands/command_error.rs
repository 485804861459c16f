use std::io;

use thiserror::Error;

use crate::services::forecast_config::ForecastConfigError;
use crate::services::forecast_error::ForecastError;
use crate::services::work_item_file::WorkItemFileError;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ForecastConfigError),
    #[error(transparent)]
    WorkItems(#[from] WorkItemFileError),
    #[error("invalid {name} date '{value}', expected YYYY-MM-DD")]
    InvalidDate { name: &'static str, value: String },
    #[error(transparent)]
    Forecast(#[from] ForecastError),
    #[error("failed to serialize output as json: {0}")]
    SerializeJson(#[from] serde_json::Error),
    #[error("failed to serialize output as yaml: {0}")]
    SerializeYaml(#[from] serde_yaml::Error),
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
}

pub fn parse_cli_date(name: &'static str, value: &str) -> Result<chrono::NaiveDate, CommandError> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| CommandError::InvalidDate {
        name,
        value: value.to_string(),
    })
}
