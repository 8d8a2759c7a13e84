use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;

/// Serialize a table as a pretty JSON array (4-space indent) and write it.
///
/// Writes to a sibling `.tmp` file first and renames it over `path`, so
/// readers see either the previous snapshot or the new one, never half of one.
pub fn write_table<T: Serialize>(table: &[T], path: &Path) -> Result<(), CoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    table
        .serialize(&mut ser)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize {}: {e}", path.display())))?;

    let tmp = temp_path(path);
    fs::write(&tmp, &buf)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    tracing::debug!(path = %path.display(), rows = table.len(), "wrote snapshot");
    Ok(())
}

/// Read a table previously written with [`write_table`].
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CoreError> {
    let bytes = fs::read(path)
        .map_err(|e| CoreError::FileIO(format!("{}: {e}", path.display())))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        CoreError::Deserialization(format!("Failed to parse {}: {e}", path.display()))
    })
}

/// Read any JSON document as-is. The server uses this to pass a snapshot
/// through without caring about its row type.
pub fn read_raw(path: &Path) -> Result<serde_json::Value, CoreError> {
    let bytes = fs::read(path)
        .map_err(|e| CoreError::FileIO(format!("{}: {e}", path.display())))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        CoreError::Deserialization(format!("Failed to parse {}: {e}", path.display()))
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
