//! Fake HAL implementation for testing.
//!
//! This implementation keeps an in-memory directory tree and environment and
//! records every operation, allowing CI-safe testing of noexec fallbacks and
//! Windows search-path handling on any host.

use super::{EnvOps, FsOps, MountFlagOps, SearchPathPolicy, UserOps};
use crate::{HalError, HalResult};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Operation records for testing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    StatFs {
        path: PathBuf,
    },
    StatDir {
        path: PathBuf,
    },
    CreateUniqueDir {
        parent: PathBuf,
        prefix: String,
        dir: PathBuf,
    },
    CreateDirAll {
        path: PathBuf,
    },
    RemoveDirAll {
        path: PathBuf,
    },
    SetEnv {
        name: String,
        value: String,
    },
}

/// Shared state for FakeHal operations.
#[derive(Debug, Clone, Default)]
struct FakeHalState {
    /// All operations that were recorded
    operations: Vec<Operation>,
    /// Directories that currently exist
    dirs: HashSet<PathBuf>,
    /// Paths whose filesystem reports the noexec flag
    noexec: HashSet<PathBuf>,
    /// Paths whose mount-flag query fails
    failing_statfs: HashSet<PathBuf>,
    fail_unique_dirs: bool,
    fail_dir_all: bool,
    env: HashMap<String, String>,
    next_id: u32,
}

/// Fake HAL implementation that simulates operations without touching the host.
#[derive(Debug, Clone)]
pub struct FakeHal {
    state: Arc<Mutex<FakeHalState>>,
    temp_dir: PathBuf,
    uid: Option<u32>,
    policy: SearchPathPolicy,
}

impl Default for FakeHal {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHal {
    /// A Unix-like host: temp dir `/tmp` (existing), uid 1000, rpath policy.
    pub fn new() -> Self {
        let hal = Self {
            state: Arc::new(Mutex::new(FakeHalState::default())),
            temp_dir: PathBuf::from("/tmp"),
            uid: Some(1000),
            policy: SearchPathPolicy::Rpath,
        };
        hal.add_dir("/tmp");
        hal
    }

    pub fn with_uid(mut self, uid: Option<u32>) -> Self {
        self.uid = uid;
        self
    }

    pub fn with_search_path_policy(mut self, policy: SearchPathPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn state(&self) -> MutexGuard<'_, FakeHalState> {
        match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn record(&self, op: Operation) {
        self.state().operations.push(op);
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<Operation> {
        self.state().operations.clone()
    }

    /// Get the number of operations recorded.
    pub fn operation_count(&self) -> usize {
        self.state().operations.len()
    }

    /// Check if a specific operation was recorded.
    pub fn has_operation(&self, check: impl Fn(&Operation) -> bool) -> bool {
        self.state().operations.iter().any(check)
    }

    /// Clear all recorded operations.
    pub fn clear(&self) {
        self.state().operations.clear();
    }

    /// Simulate an existing directory (and its ancestors).
    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut state = self.state();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            state.dirs.insert(ancestor.to_path_buf());
        }
    }

    pub fn dir_exists(&self, path: &Path) -> bool {
        self.state().dirs.contains(path)
    }

    /// Report the filesystem holding `path` as mounted `noexec`.
    pub fn mark_noexec(&self, path: impl Into<PathBuf>) {
        self.state().noexec.insert(path.into());
    }

    /// Make the mount-flag query for `path` fail.
    pub fn fail_statfs(&self, path: impl Into<PathBuf>) {
        self.state().failing_statfs.insert(path.into());
    }

    /// Make every `create_unique_dir` call fail with a permission error.
    pub fn fail_unique_dirs(&self) {
        self.state().fail_unique_dirs = true;
    }

    /// Make every `create_dir_all` call fail with a permission error.
    pub fn fail_dir_all(&self) {
        self.state().fail_dir_all = true;
    }

    /// Seed an environment variable without recording an operation.
    pub fn preset_env(&self, name: &str, value: &str) {
        self.state().env.insert(name.to_string(), value.to_string());
    }
}

fn not_found(path: &Path) -> HalError {
    HalError::Io(io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    ))
}

impl MountFlagOps for FakeHal {
    fn is_noexec(&self, path: &Path) -> HalResult<bool> {
        self.record(Operation::StatFs {
            path: path.to_path_buf(),
        });
        let state = self.state();
        if state.failing_statfs.contains(path) {
            return Err(HalError::Other(format!("statfs {} failed", path.display())));
        }
        if !state.dirs.contains(path) {
            return Err(not_found(path));
        }
        Ok(state.noexec.contains(path))
    }
}

impl FsOps for FakeHal {
    fn default_temp_dir(&self) -> PathBuf {
        self.temp_dir.clone()
    }

    fn stat_dir(&self, path: &Path) -> HalResult<()> {
        self.record(Operation::StatDir {
            path: path.to_path_buf(),
        });
        if self.dir_exists(path) {
            Ok(())
        } else {
            Err(not_found(path))
        }
    }

    fn create_unique_dir(&self, parent: &Path, prefix: &str) -> HalResult<PathBuf> {
        let dir = {
            let mut state = self.state();
            if !state.dirs.contains(parent) {
                return Err(not_found(parent));
            }
            if state.fail_unique_dirs {
                return Err(HalError::PermissionDenied);
            }
            state.next_id += 1;
            let dir = parent.join(format!("{prefix}{:08}", state.next_id));
            state.dirs.insert(dir.clone());
            dir
        };
        self.record(Operation::CreateUniqueDir {
            parent: parent.to_path_buf(),
            prefix: prefix.to_string(),
            dir: dir.clone(),
        });
        Ok(dir)
    }

    fn create_dir_all(&self, path: &Path) -> HalResult<()> {
        if self.state().fail_dir_all {
            return Err(HalError::PermissionDenied);
        }
        self.add_dir(path);
        self.record(Operation::CreateDirAll {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> HalResult<()> {
        self.record(Operation::RemoveDirAll {
            path: path.to_path_buf(),
        });
        let mut state = self.state();
        if !state.dirs.contains(path) {
            return Err(not_found(path));
        }
        state.dirs.retain(|dir| !dir.starts_with(path));
        Ok(())
    }
}

impl UserOps for FakeHal {
    fn current_uid(&self) -> Option<u32> {
        self.uid
    }
}

impl EnvOps for FakeHal {
    fn env_var(&self, name: &str) -> Option<String> {
        self.state().env.get(name).cloned()
    }

    fn set_env_var(&self, name: &str, value: &str) {
        self.state().env.insert(name.to_string(), value.to_string());
        self.record(Operation::SetEnv {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn search_path_policy(&self) -> SearchPathPolicy {
        self.policy
    }
}
