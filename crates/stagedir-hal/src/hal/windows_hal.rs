//! Windows HAL implementation.

use super::{native_fs, EnvOps, FsOps, MountFlagOps, SearchPathPolicy, UserOps};
use crate::HalResult;
use std::path::{Path, PathBuf};

/// Real HAL implementation for Windows systems.
#[derive(Debug, Clone, Default)]
pub struct WindowsHal;

impl WindowsHal {
    pub fn new() -> Self {
        Self
    }
}

impl MountFlagOps for WindowsHal {
    // No mount-flag introspection on Windows.
    fn is_noexec(&self, _path: &Path) -> HalResult<bool> {
        Ok(false)
    }
}

impl FsOps for WindowsHal {
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

impl UserOps for WindowsHal {
    fn current_uid(&self) -> Option<u32> {
        None
    }
}

impl EnvOps for WindowsHal {
    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn set_env_var(&self, name: &str, value: &str) {
        std::env::set_var(name, value);
    }

    fn search_path_policy(&self) -> SearchPathPolicy {
        SearchPathPolicy::Prepend {
            var: "PATH",
            separator: ';',
        }
    }
}
