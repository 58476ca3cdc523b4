//! Atomic file replacement shared by the file-backed collaborators.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a uniquely named tempfile in the
/// same directory.
///
/// Readers see either the previous content or the new one, never a partial
/// file. Concurrent writers each get their own tempfile; the last persist
/// wins. The parent directory must already exist.
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
