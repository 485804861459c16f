use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Column names are compared with all spaces removed, so a header such as
/// `In Progress` matches a requested `InProgress`.
pub fn normalize_column_name(name: &str) -> String {
    name.chars().filter(|c| *c != ' ').collect()
}

/// One raw input row, keyed by normalized column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkItemRecord {
    pub fields: BTreeMap<String, String>,
}

impl WorkItemRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, column: &str, value: &str) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: &str, value: &str) {
        self.fields
            .insert(normalize_column_name(column), value.to_string());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(&normalize_column_name(column))
            .map(String::as_str)
    }
}

/// The tabular collection handed to the engine. `columns` is the union of the
/// keys of all rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkItemTable {
    pub columns: Vec<String>,
    pub rows: Vec<WorkItemRecord>,
}

impl WorkItemTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<WorkItemRecord>) -> Self {
        let mut table = Self::new();
        for row in rows {
            table.push(row);
        }
        table
    }

    pub fn push(&mut self, record: WorkItemRecord) {
        for column in record.fields.keys() {
            if !self.columns.contains(column) {
                self.columns.push(column.clone());
            }
        }
        self.rows.push(record);
    }

    pub fn has_column(&self, name: &str) -> bool {
        let name = normalize_column_name(name);
        self.columns.iter().any(|column| *column == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A non-cancelled record with a parsed start date. `end_date` is `None` when
/// the end column held text that is not a date, which marks the item as
/// still in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedRecord {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}
