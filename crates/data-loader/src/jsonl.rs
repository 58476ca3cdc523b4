//! Loader for JSON Lines record files.
//!
//! Each non-blank line holds one JSON object:
//! `{"id": 12, "clicks": 40, "views": 1200}`

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::error::{DataLoadError, Result};
use crate::Record;

/// Parse JSON Lines content into records.
///
/// `file` is only used in error messages. Blank lines are skipped; any
/// other line that isn't a JSON object fails the whole batch.
pub fn parse_records(content: &str, file: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let value: Value =
            serde_json::from_str(line_trimmed).map_err(|e| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: e.to_string(),
            })?;

        match value {
            Value::Object(record) => records.push(record),
            other => {
                return Err(DataLoadError::ParseError {
                    file: file.to_string(),
                    line: line_no,
                    reason: format!("expected a JSON object, found {}", kind_of(&other)),
                });
            }
        }
    }

    Ok(records)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Reads every record from a JSON Lines file on each load.
#[derive(Debug, Clone)]
pub struct JsonLinesLoader {
    name: String,
    path: PathBuf,
}

impl JsonLinesLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: format!("jsonl:{}", path.display()),
            path,
        }
    }

    /// Read and parse the file.
    pub fn read(&self) -> Result<Vec<Record>> {
        let content = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DataLoadError::FileNotFound {
                path: self.path.display().to_string(),
            },
            _ => DataLoadError::IoError(e),
        })?;

        let records = parse_records(&content, &self.path.display().to_string())?;
        debug!("Read {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}

impl pipeline::DataLoader<Record> for JsonLinesLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> anyhow::Result<Vec<Record>> {
        Ok(self.read()?)
    }
}
