use std::io;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::services::forecast::EngineSettings;
use crate::services::record_cleaner::CleaningConfig;

#[derive(Error, Debug)]
pub enum ForecastConfigError {
    #[error("failed to read forecast config: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse forecast config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("no {0} column given on the command line or in the config file")]
    MissingColumnName(&'static str),
}

/// Optional YAML file with forecast defaults. Command line flags take
/// precedence over values found here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastConfigFile {
    pub start_column: Option<String>,
    pub end_column: Option<String>,
    pub id_column: Option<String>,
    pub cancellation_columns: Option<Vec<String>>,
    pub cancellation_values: Option<Vec<String>>,
    pub duration: Option<String>,
    pub iterations: Option<usize>,
    pub horizon_multiplier: Option<usize>,
    pub percentiles: Option<Vec<f64>>,
    pub display_precision: Option<u32>,
}

impl ForecastConfigFile {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ForecastConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, ForecastConfigError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(input)?)
    }

    /// Loads the file when a path is given, otherwise returns the defaults.
    pub fn load_optional(path: Option<&str>) -> Result<Self, ForecastConfigError> {
        match path {
            Some(path) => Self::from_yaml_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn cleaning_config(
        &self,
        start_column: Option<&str>,
        end_column: Option<&str>,
    ) -> Result<CleaningConfig, ForecastConfigError> {
        let start_column = start_column
            .or(self.start_column.as_deref())
            .ok_or(ForecastConfigError::MissingColumnName("start"))?;
        let end_column = end_column
            .or(self.end_column.as_deref())
            .ok_or(ForecastConfigError::MissingColumnName("end"))?;

        let mut config = CleaningConfig::new(start_column, end_column);
        if let Some(id_column) = &self.id_column {
            config.id_column = id_column.clone();
        }
        if let Some(columns) = &self.cancellation_columns {
            config.cancellation_column_candidates = columns.clone();
        }
        if let Some(values) = &self.cancellation_values {
            config.cancellation_values = values.clone();
        }
        Ok(config)
    }

    pub fn engine_settings(
        &self,
        percentiles: Option<Vec<f64>>,
        horizon_multiplier: Option<usize>,
    ) -> EngineSettings {
        let defaults = EngineSettings::default();
        EngineSettings {
            horizon_multiplier: horizon_multiplier
                .or(self.horizon_multiplier)
                .unwrap_or(defaults.horizon_multiplier),
            percentile_levels: percentiles
                .or_else(|| self.percentiles.clone())
                .unwrap_or(defaults.percentile_levels),
            display_precision: self
                .display_precision
                .unwrap_or(defaults.display_precision),
        }
    }
}
