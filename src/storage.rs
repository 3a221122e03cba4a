//! Atomic file output.
//!
//! Containers are written through a temporary file in the target directory
//! and renamed into place on success, so an interrupted run never leaves a
//! torn container at the destination.

use crate::error::{CofferError, Result};
use std::fs::File;
use std::path::Path;
use tempfile::Builder;

/// Writes `path` atomically: `write_fn` fills a sibling temporary file,
/// which is persisted to `path` only if the closure succeeds.
///
/// # Errors
///
/// Propagates errors from the closure and from creating or persisting the
/// temporary file. On error the destination is left untouched.
pub fn write_atomically<F>(path: &Path, write_fn: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = Builder::new()
        .prefix(".coffer-")
        .suffix(".tmp")
        .tempfile_in(dir)?;

    write_fn(temp_file.as_file_mut())?;

    temp_file.persist(path).map_err(|err| CofferError::Io(err.error))?;
    Ok(())
}
