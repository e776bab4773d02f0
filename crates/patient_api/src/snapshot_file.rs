//! JSON snapshot file persistence.
//!
//! # Invariants
//! - Writes go to a sibling temp file first and are renamed into place, so a
//!   crash never leaves a half-written snapshot at `path`.
//! - A missing file reads as `None`, not an error.

use crate::error::{ApiError, ApiResult};
use log::info;
use patient_core::Snapshot;
use std::path::{Path, PathBuf};

/// Writes `snapshot` as pretty JSON to `path`, creating parent directories.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> ApiResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
        }
    }

    let json = serde_json::to_string_pretty(snapshot)?;
    let temp_path = temp_sibling(path);
    std::fs::write(&temp_path, json).map_err(|source| io_error(&temp_path, source))?;
    std::fs::rename(&temp_path, path).map_err(|source| io_error(path, source))?;

    info!(
        "event=snapshot_write module=api status=ok count={} path={}",
        snapshot.patients.len(),
        path.display()
    );
    Ok(())
}

/// Reads a snapshot from `path`; `Ok(None)` when the file does not exist.
pub fn read_snapshot(path: &Path) -> ApiResult<Option<Snapshot>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(io_error(path, source)),
    };
    let snapshot: Snapshot = serde_json::from_str(&raw)?;
    Ok(Some(snapshot))
}

/// Removes the snapshot file. Returns whether a file was removed.
pub fn remove_snapshot(path: &Path) -> ApiResult<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(io_error(path, source)),
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(path: &Path, source: std::io::Error) -> ApiError {
    ApiError::Io {
        path: path.to_path_buf(),
        source,
    }
}
