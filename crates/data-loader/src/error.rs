//! Error types for the data-loader crate.
//!
//! Loaders and handlers report these through `anyhow` at the pipeline
//! boundary; callers that need the specific case can downcast.

use thiserror::Error;

/// Errors that can occur while reading records or writing results
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in a data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// Results couldn't be serialized
    #[error("Failed to serialize results: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
