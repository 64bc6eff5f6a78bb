//! File helpers for history exports and emotion table files.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::utilities::errors::MuzaError;

/// Write `data` as pretty JSON to `path`, creating parent directories.
///
/// Non-ASCII text is written as-is, not `\u` escaped.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), MuzaError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    let content = serde_json::to_string_pretty(data)?;
    fs::write(path, content)?;
    Ok(())
}

/// Read a UTF-8 file.
pub fn read_text(path: &Path) -> Result<String, MuzaError> {
    Ok(fs::read_to_string(path)?)
}
