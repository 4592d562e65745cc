//! Internal utility functions.
//!
//! Directory housekeeping shared by the decoder staging area and the
//! output directory.

use std::fs;
use std::io::Result as IoResult;
use std::path::Path;

/// Reset a directory to an empty state: remove it if it exists, then
/// recreate it (including missing parents).
pub(crate) fn clear_dir(path: impl AsRef<Path>) -> IoResult<()> {
    let path = path.as_ref();
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    fs::create_dir_all(path)
}

/// Remove a directory tree if it exists. Missing directories are fine.
pub(crate) fn remove_dir_if_exists(path: impl AsRef<Path>) -> IoResult<()> {
    let path = path.as_ref();
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    Ok(())
}
