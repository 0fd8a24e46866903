//! Filesystem operations trait.

use crate::HalResult;
use std::path::{Path, PathBuf};

/// Trait for the directory operations used to build and tear down scratch trees.
pub trait FsOps {
    /// Platform default location for temporary files (honors `TMPDIR` / `TEMP`).
    fn default_temp_dir(&self) -> PathBuf;

    /// Stat a directory, failing if it does not exist.
    fn stat_dir(&self, path: &Path) -> HalResult<()>;

    /// Create a new, uniquely named directory inside `parent`.
    ///
    /// # Arguments
    /// * `parent` - Existing directory to create the new one in
    /// * `prefix` - Leading part of the generated name (e.g. `stagedir`)
    fn create_unique_dir(&self, parent: &Path, prefix: &str) -> HalResult<PathBuf>;

    /// Create a directory and any missing parents.
    fn create_dir_all(&self, path: &Path) -> HalResult<()>;

    /// Recursively remove a directory and everything below it.
    fn remove_dir_all(&self, path: &Path) -> HalResult<()>;
}
