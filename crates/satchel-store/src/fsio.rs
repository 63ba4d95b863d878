//! Small file-system primitives shared by the storage layer.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, warn};

use satchel_core::Result;

/// Write `data` to `path` atomically: parent directories are created, the
/// bytes land in a sibling temp file, and a rename makes them visible.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    debug!(path = %path.display(), size = data.len(), "fsio: write");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            warn!(parent = %parent.display(), error = %e, "fsio: create_dir_all failed");
            e
        })?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path).map_err(|e| {
        warn!(temp_path = %temp_path.display(), error = %e, "fsio: File::create failed");
        e
    })?;
    file.write_all(data).map_err(|e| {
        warn!(error = %e, "fsio: write_all failed");
        e
    })?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| {
        warn!(from = %temp_path.display(), to = %path.display(), error = %e, "fsio: rename failed");
        e
    })?;

    Ok(())
}

/// Read a file that may legitimately be absent.
pub(crate) fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Remove a directory tree if it exists. Failures are surfaced; absence is
/// not an error.
pub(crate) fn remove_tree(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
