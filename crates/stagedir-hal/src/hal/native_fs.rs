//! Filesystem calls shared by the native backends.

use crate::HalResult;
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) fn stat_dir(path: &Path) -> HalResult<()> {
    fs::metadata(path)?;
    Ok(())
}

/// Random suffix, owner-only permissions; the directory outlives the handle.
pub(crate) fn create_unique_dir(parent: &Path, prefix: &str) -> HalResult<PathBuf> {
    let dir = tempfile::Builder::new().prefix(prefix).tempdir_in(parent)?;
    Ok(dir.keep())
}

pub(crate) fn create_dir_all(path: &Path) -> HalResult<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

pub(crate) fn remove_dir_all(path: &Path) -> HalResult<()> {
    fs::remove_dir_all(path)?;
    Ok(())
}
