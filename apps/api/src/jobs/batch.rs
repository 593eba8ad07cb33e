//! Batch file parsing: CSV with a header row, or a JSON array of objects.
//!
//! Column validation happens here, before any network call. A file missing a
//! required column is rejected as a whole; a record with a blank required
//! value is left to fail on its own during upload.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::jobs::models::{JobPosting, REQUIRED_FIELDS};

#[derive(Debug, Error)]
pub enum BatchFileError {
    #[error("unsupported batch file format '{0}' (expected .csv or .json)")]
    UnsupportedFormat(String),

    #[error("missing required fields: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses a batch upload, choosing the format by file extension.
pub fn parse_batch_file(file_name: &str, bytes: &[u8]) -> Result<Vec<JobPosting>, BatchFileError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => parse_csv(bytes),
        "json" => parse_json(bytes),
        other => Err(BatchFileError::UnsupportedFormat(other.to_string())),
    }
}

fn check_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Result<(), BatchFileError> {
    let present: BTreeSet<&str> = columns.into_iter().map(str::trim).collect();
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| {
            !present.contains(*field) && !(**field == "job_title" && present.contains("title"))
        })
        .map(|field| field.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(BatchFileError::MissingColumns(missing))
    }
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<JobPosting>, BatchFileError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    check_columns(reader.headers()?.iter())?;

    reader
        .deserialize::<JobPosting>()
        .map(|record| record.map_err(BatchFileError::from))
        .collect()
}

fn parse_json(bytes: &[u8]) -> Result<Vec<JobPosting>, BatchFileError> {
    let records: Vec<Map<String, Value>> = serde_json::from_slice(bytes)?;

    let columns: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.keys().map(String::as_str))
        .collect();
    check_columns(columns)?;

    records
        .into_iter()
        .map(|record| serde_json::from_value(Value::Object(stringify_scalars(record))))
        .collect::<Result<_, _>>()
        .map_err(BatchFileError::from)
}

/// Batch files written by spreadsheets often carry numeric salaries or nulls
/// for empty cells. Numbers and booleans become strings; nulls are dropped.
fn stringify_scalars(record: Map<String, Value>) -> Map<String, Value> {
    record
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::Number(n) => Some((key, Value::String(n.to_string()))),
            Value::Bool(b) => Some((key, Value::String(b.to_string()))),
            other => Some((key, other)),
        })
        .collect()
}
