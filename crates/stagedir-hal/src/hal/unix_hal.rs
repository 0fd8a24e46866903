//! Unix HAL implementation using real system calls.

use super::{native_fs, EnvOps, FsOps, MountFlagOps, SearchPathPolicy, UserOps};
use crate::{HalError, HalResult};
use std::path::{Path, PathBuf};

/// Real HAL implementation for Unix systems.
#[derive(Debug, Clone, Default)]
pub struct UnixHal;

impl UnixHal {
    pub fn new() -> Self {
        Self
    }
}

fn map_nix_err(err: nix::errno::Errno) -> HalError {
    use nix::errno::Errno;
    match err {
        Errno::EACCES | Errno::EPERM => HalError::PermissionDenied,
        other => HalError::Nix(other),
    }
}

impl MountFlagOps for UnixHal {
    fn is_noexec(&self, path: &Path) -> HalResult<bool> {
        let stat = nix::sys::statvfs::statvfs(path).map_err(map_nix_err)?;
        log::debug!("{} mount flags: {:?}", path.display(), stat.flags());

        // Only Linux and Android expose the noexec bit through statvfs.
        #[cfg(any(target_os = "linux", target_os = "android"))]
        {
            Ok(stat
                .flags()
                .contains(nix::sys::statvfs::FsFlags::ST_NOEXEC))
        }
        #[cfg(not(any(target_os = "linux", target_os = "android")))]
        {
            Ok(false)
        }
    }
}

impl FsOps for UnixHal {
    fn default_temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }

    fn stat_dir(&self, path: &Path) -> HalResult<()> {
        native_fs::stat_dir(path)
    }

    fn create_unique_dir(&self, parent: &Path, prefix: &str) -> HalResult<PathBuf> {
        native_fs::create_unique_dir(parent, prefix)
    }

    fn create_dir_all(&self, path: &Path) -> HalResult<()> {
        native_fs::create_dir_all(path)
    }

    fn remove_dir_all(&self, path: &Path) -> HalResult<()> {
        native_fs::remove_dir_all(path)
    }
}

impl UserOps for UnixHal {
    fn current_uid(&self) -> Option<u32> {
        Some(nix::unistd::getuid().as_raw())
    }
}

impl EnvOps for UnixHal {
    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn set_env_var(&self, name: &str, value: &str) {
        std::env::set_var(name, value);
    }

    // Linux and Darwin payloads carry an rpath.
    fn search_path_policy(&self) -> SearchPathPolicy {
        SearchPathPolicy::Rpath
    }
}
