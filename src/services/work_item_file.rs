use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::domain::work_item::{WorkItemRecord, WorkItemTable};

#[derive(Error, Debug)]
pub enum WorkItemFileError {
    #[error("failed to read work item file: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse work item yaml: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("failed to parse work item json: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("record {index} has a non-scalar value in column {column}")]
    InvalidValue { index: usize, column: String },
}

/// Loads a list of `column: value` maps from a YAML file, or from JSON when the
/// path ends in `.json`.
pub fn load_work_items<P: AsRef<Path>>(path: P) -> Result<WorkItemTable, WorkItemFileError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    if is_json_path(path) {
        deserialize_work_items_from_json_str(&contents)
    } else {
        deserialize_work_items_from_yaml_str(&contents)
    }
}

pub fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"))
}

pub fn deserialize_work_items_from_yaml_str(
    input: &str,
) -> Result<WorkItemTable, WorkItemFileError> {
    let rows: Vec<BTreeMap<String, serde_yaml::Value>> = serde_yaml::from_str(input)?;
    build_table(rows, |value| match value {
        serde_yaml::Value::Null => Some(String::new()),
        serde_yaml::Value::Bool(flag) => Some(flag.to_string()),
        serde_yaml::Value::Number(number) => Some(number.to_string()),
        serde_yaml::Value::String(text) => Some(text),
        _ => None,
    })
}

pub fn deserialize_work_items_from_json_str(
    input: &str,
) -> Result<WorkItemTable, WorkItemFileError> {
    let rows: Vec<BTreeMap<String, serde_json::Value>> = serde_json::from_str(input)?;
    build_table(rows, |value| match value {
        serde_json::Value::Null => Some(String::new()),
        serde_json::Value::Bool(flag) => Some(flag.to_string()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        serde_json::Value::String(text) => Some(text),
        _ => None,
    })
}

fn build_table<V>(
    rows: Vec<BTreeMap<String, V>>,
    to_text: impl Fn(V) -> Option<String>,
) -> Result<WorkItemTable, WorkItemFileError> {
    let mut table = WorkItemTable::new();
    for (index, row) in rows.into_iter().enumerate() {
        let mut record = WorkItemRecord::new();
        for (column, value) in row {
            let text = to_text(value).ok_or_else(|| WorkItemFileError::InvalidValue {
                index: index + 1,
                column: column.clone(),
            })?;
            record.set(&column, &text);
        }
        table.push(record);
    }
    Ok(table)
}
