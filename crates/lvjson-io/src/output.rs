//! File output helpers.
//!
//! Outputs are written to a temporary file in the destination directory and
//! renamed over the target once complete, so a failed run never leaves a
//! truncated document behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::ConvertError;

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> Result<(), ConvertError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .map_err(|e| ConvertError::io("failed to create directory", dir, e)),
        _ => Ok(()),
    }
}

/// Replace `path` with `contents` atomically.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ConvertError> {
    ensure_parent_dir(path)?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let write_err = |e| ConvertError::io("failed to write", path, e);
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote output");
    Ok(())
}

/// Read a whole text file, dropping a leading UTF-8 byte order mark.
pub fn read_text(path: &Path) -> Result<String, ConvertError> {
    let mut text =
        fs::read_to_string(path).map_err(|e| ConvertError::io("failed to read", path, e))?;
    if text.starts_with('\u{feff}') {
        text.replace_range(..'\u{feff}'.len_utf8(), "");
    }
    Ok(text)
}
