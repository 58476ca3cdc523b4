//! Errors raised by the reference vectorizer and regression model.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("record {index} is missing feature '{field}'")]
    MissingFeature { index: usize, field: String },

    #[error("record {index} has a non-numeric value for '{field}'")]
    NonNumericFeature { index: usize, field: String },

    #[error("vector has {found} features, model expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("no labelled vectors to fit on")]
    NoTrainingData,

    #[error("training system is singular; add data or increase l2 regularization")]
    SingularSystem,

    #[error("model has not been fitted or loaded")]
    NotFitted,

    #[error("unsupported snapshot format version {found} (expected {expected})")]
    UnsupportedVersion { expected: u32, found: u32 },

    #[error("I/O error on model snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid model snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
