//! Result handler writing recommendations to a JSON file.

use std::path::PathBuf;

use tracing::debug;

use crate::error::Result;
use crate::io::atomic_write;
use crate::Record;

/// Writes each result as a pretty-printed JSON array, highest score first.
///
/// The previous file is replaced atomically through [`atomic_write`], so
/// readers never observe a half-written array.
#[derive(Debug, Clone)]
pub struct JsonFileHandler {
    name: String,
    path: PathBuf,
}

impl JsonFileHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: format!("json:{}", path.display()),
            path,
        }
    }

    pub fn write(&self, result: &[Record]) -> Result<()> {
        let body = serde_json::to_vec_pretty(result)?;
        atomic_write(&self.path, &body)?;

        debug!("Wrote {} records to {}", result.len(), self.path.display());
        Ok(())
    }
}

impl pipeline::ResultHandler<Record> for JsonFileHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, result: &[Record]) -> anyhow::Result<()> {
        Ok(self.write(result)?)
    }
}
