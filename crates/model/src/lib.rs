//! Reference scoring collaborators for the recommendation pipeline.
//!
//! This crate provides:
//! - `FeatureVectorizer`, reading named numeric fields from JSON records
//! - `LinearRegression`, a ridge least-squares model persisted as a
//!   versioned JSON snapshot
//!
//! Both are plain implementations of the pipeline's collaborator traits;
//! the pipeline never depends on them directly.

pub mod error;
pub mod linear;
pub mod vectorizer;

pub use error::{ModelError, Result};
pub use linear::{LinearRegression, ModelSnapshot, SNAPSHOT_FORMAT_VERSION};
pub use vectorizer::{FeatureVector, FeatureVectorizer};
