//! Mount flag introspection trait.

use crate::HalResult;
use std::path::Path;

/// Trait for querying the mount flags of the filesystem holding a path.
pub trait MountFlagOps {
    /// Check whether the filesystem containing `path` is mounted `noexec`.
    ///
    /// Backends without mount-flag introspection report `Ok(false)`. Query
    /// failures are returned as errors; deciding what to do with them is the
    /// caller's business.
    fn is_noexec(&self, path: &Path) -> HalResult<bool>;
}
