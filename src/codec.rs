use crate::dates::DateKey;
use crate::models::{AppData, Goal, Records, STORE_VERSION, deserialize_records};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("file is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("backup is missing the '{0}' field")]
    MissingField(&'static str),
    #[error("backup has an unexpected shape: {0}")]
    Shape(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: u32,
    pub goals: Vec<Goal>,
    pub records: Records,
    pub exported_at: DateTime<Utc>,
}

/// A backup that passed validation and has not been applied yet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDocument {
    #[serde(default)]
    pub version: Option<u32>,
    pub goals: Vec<Goal>,
    #[serde(deserialize_with = "deserialize_records")]
    pub records: Records,
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub goals: usize,
    pub records: usize,
}

impl ImportSummary {
    pub fn confirmation_message(&self) -> String {
        format!(
            "Import this backup?\n\nGoals: {}\nRecords: {}\n\nYour current data will be overwritten.",
            self.goals, self.records
        )
    }
}

/// What the page shows before asking to replace the current data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPreview {
    pub goals: usize,
    pub records: usize,
    pub message: String,
}

impl From<ImportSummary> for ImportPreview {
    fn from(summary: ImportSummary) -> Self {
        Self {
            goals: summary.goals,
            records: summary.records,
            message: summary.confirmation_message(),
        }
    }
}

pub fn export_document(data: &AppData, now: DateTime<Utc>) -> ExportDocument {
    ExportDocument {
        version: STORE_VERSION,
        goals: data.goals.clone(),
        records: data.records.clone(),
        exported_at: now,
    }
}

pub fn export_json(data: &AppData, now: DateTime<Utc>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&export_document(data, now))
}

pub fn export_filename(date: DateKey) -> String {
    format!("goal-tracker-backup-{date}.json")
}

/// Validates a backup without touching any state.
pub fn parse_import(text: &str) -> Result<ImportDocument, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::Parse)?;
    for field in ["goals", "records"] {
        if value.get(field).is_none_or(Value::is_null) {
            return Err(ImportError::MissingField(field));
        }
    }
    serde_json::from_value(value).map_err(ImportError::Shape)
}

impl ImportDocument {
    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            goals: self.goals.len(),
            records: self.records.values().map(|records| records.len()).sum(),
        }
    }

    pub fn into_data(self) -> AppData {
        AppData {
            version: STORE_VERSION,
            goals: self.goals,
            records: self.records,
        }
    }
}
