//! # Data Loader Crate
//!
//! File-backed collaborators for the recommendation pipeline.
//!
//! ## Main Components
//!
//! - **jsonl**: `JsonLinesLoader`, reads one JSON object per line
//! - **handler**: `JsonFileHandler`, writes ranked results as a JSON array
//! - **io**: `atomic_write`, tempfile-and-persist replacement of a file
//! - **error**: Error types for reading and writing
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{JsonFileHandler, JsonLinesLoader};
//!
//! let training = JsonLinesLoader::new("data/training.jsonl");
//! let candidates = JsonLinesLoader::new("data/candidates.jsonl");
//! let output = JsonFileHandler::new("out/recommendations.json");
//! ```

pub mod error;
pub mod handler;
pub mod io;
pub mod jsonl;

pub use error::{DataLoadError, Result};
pub use handler::JsonFileHandler;
pub use io::atomic_write;
pub use jsonl::{parse_records, JsonLinesLoader};

/// One domain record: a JSON object keyed by field name.
pub type Record = serde_json::Map<String, serde_json::Value>;
