//! Scratch directory manager.
//!
//! One `ScratchDirs` owns one lazily created scratch tree. The resolved
//! payloads path is cached under a mutex: once set it never changes for the
//! lifetime of the context.

use crate::config::ScratchConfig;
use crate::search_path;
use log::{debug, info, warn};
use stagedir_error::{StageError, StageResult};
use stagedir_hal::ScratchHal;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

pub struct ScratchDirs<H: ScratchHal> {
    hal: H,
    config: ScratchConfig,
    payloads: Mutex<Option<PathBuf>>,
}

impl<H: ScratchHal> ScratchDirs<H> {
    pub fn new(hal: H, config: ScratchConfig) -> Self {
        Self {
            hal,
            config,
            payloads: Mutex::new(None),
        }
    }

    pub fn hal(&self) -> &H {
        &self.hal
    }

    pub fn config(&self) -> &ScratchConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, Option<PathBuf>> {
        match self.payloads.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// The payloads directory, if one has been resolved.
    pub fn cached(&self) -> Option<PathBuf> {
        self.lock().clone()
    }

    /// Forget the cached path without touching the filesystem.
    pub fn reset(&self) {
        *self.lock() = None;
    }

    /// Return the payloads directory, creating the scratch tree on first use.
    ///
    /// Repeated calls return the same path, even after [`cleanup`](Self::cleanup).
    pub fn payloads_dir(&self) -> StageResult<PathBuf> {
        let mut cached = self.lock();
        if let Some(dir) = cached.as_ref() {
            return Ok(dir.clone());
        }

        let temp_root = self
            .config
            .temp_root
            .clone()
            .unwrap_or_else(|| self.hal.default_temp_dir());

        let parent = if self.is_noexec(&temp_root) {
            let uid = self.hal.current_uid().ok_or(StageError::NoUserId)?;
            let run_dir = self.config.runtime_dir(uid);
            info!(
                "{} is mounted with 'noexec' flag; staging payloads in {} instead",
                temp_root.display(),
                run_dir.display()
            );
            if let Err(err) = self.hal.stat_dir(&run_dir) {
                if err.is_not_found() {
                    return Err(StageError::RuntimeDirMissing {
                        path: run_dir,
                        source: err,
                    });
                }
            }
            run_dir
        } else {
            temp_root
        };

        let scratch = self
            .hal
            .create_unique_dir(&parent, &self.config.prefix)
            .map_err(|source| StageError::CreateTempDir {
                parent: parent.clone(),
                source,
            })?;

        // e.g. /tmp/stagedir3208993108/payloads
        let payloads = scratch.join(&self.config.payloads_subdir);
        self.hal
            .create_dir_all(&payloads)
            .map_err(|source| StageError::CreateDir {
                path: payloads.clone(),
                source,
            })?;

        debug!("staging payloads in {}", payloads.display());
        *cached = Some(payloads.clone());
        Ok(payloads)
    }

    /// Whether `path` lives on a filesystem mounted `noexec`.
    ///
    /// A failed query reports `false`.
    pub fn is_noexec(&self, path: &Path) -> bool {
        match self.hal.is_noexec(path) {
            Ok(noexec) => noexec,
            Err(err) => {
                debug!("unable to read mount flags of {}: {}", path.display(), err);
                false
            }
        }
    }

    /// Remove the scratch tree (the parent of the payloads directory).
    ///
    /// Best effort: failures are logged, never returned. The cached path is
    /// kept.
    pub fn cleanup(&self) {
        let cached = self.lock();
        let Some(payloads) = cached.as_ref() else {
            return;
        };
        let Some(scratch) = payloads.parent() else {
            warn!("payloads dir {} has no parent", payloads.display());
            return;
        };
        debug!("cleaning up {}", scratch.display());
        if let Err(err) = self.hal.remove_dir_all(scratch) {
            warn!("failed to clean up {}: {}", scratch.display(), err);
        }
    }

    /// Put `dir` first on the platform search path, where the platform has one.
    pub fn update_search_path(&self, dir: &Path) {
        search_path::update_search_path(&self.hal, dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagedir_hal::{FakeHal, Operation};
    use std::sync::Arc;

    fn manager(hal: &FakeHal) -> ScratchDirs<FakeHal> {
        ScratchDirs::new(hal.clone(), ScratchConfig::default())
    }

    #[test]
    fn payloads_dir_lives_in_temp_dir() {
        let hal = FakeHal::new();
        let scratch = manager(&hal);

        let dir = scratch.payloads_dir().unwrap();

        assert!(dir.starts_with("/tmp"));
        assert!(dir.ends_with("payloads"));
        assert!(dir
            .parent()
            .unwrap()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("stagedir"));
        assert!(hal.dir_exists(&dir));
    }

    #[test]
    fn payloads_dir_is_stable_across_calls() {
        let hal = FakeHal::new();
        let scratch = manager(&hal);

        let first = scratch.payloads_dir().unwrap();
        let second = scratch.payloads_dir().unwrap();

        assert_eq!(first, second);
        let created = hal
            .operations()
            .iter()
            .filter(|op| matches!(op, Operation::CreateUniqueDir { .. }))
            .count();
        assert_eq!(created, 1);
    }

    #[test]
    fn concurrent_callers_share_one_directory() {
        let hal = FakeHal::new();
        let scratch = Arc::new(manager(&hal));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let scratch = Arc::clone(&scratch);
                std::thread::spawn(move || scratch.payloads_dir().unwrap())
            })
            .collect();
        let dirs: Vec<PathBuf> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(dirs.windows(2).all(|w| w[0] == w[1]));
        let created = hal
            .operations()
            .iter()
            .filter(|op| matches!(op, Operation::CreateUniqueDir { .. }))
            .count();
        assert_eq!(created, 1);
    }

    #[test]
    fn honors_configured_temp_root() {
        let hal = FakeHal::new();
        hal.add_dir("/var/tmp");
        let config = ScratchConfig {
            temp_root: Some(PathBuf::from("/var/tmp")),
            payloads_subdir: "runners".to_string(),
            ..ScratchConfig::default()
        };
        let scratch = ScratchDirs::new(hal.clone(), config);

        let dir = scratch.payloads_dir().unwrap();

        assert!(dir.starts_with("/var/tmp"));
        assert!(dir.ends_with("runners"));
    }

    #[test]
    fn noexec_temp_dir_falls_back_to_runtime_dir() {
        let hal = FakeHal::new().with_uid(Some(4242));
        hal.mark_noexec("/tmp");
        hal.add_dir("/run/user/4242");
        let scratch = manager(&hal);

        let dir = scratch.payloads_dir().unwrap();

        assert!(dir.starts_with("/run/user/4242"));
        assert!(hal.has_operation(|op| matches!(
            op,
            Operation::StatDir { path } if path == Path::new("/run/user/4242")
        )));
    }

    #[test]
    fn noexec_without_runtime_dir_names_it() {
        let hal = FakeHal::new().with_uid(Some(4242));
        hal.mark_noexec("/tmp");
        let scratch = manager(&hal);

        let err = scratch.payloads_dir().unwrap_err();

        assert!(matches!(err, StageError::RuntimeDirMissing { .. }));
        assert_eq!(err.path(), Some(Path::new("/run/user/4242")));
        assert!(err.to_string().contains("/run/user/4242"));
        assert!(scratch.cached().is_none());
        assert!(!hal.has_operation(|op| matches!(op, Operation::CreateUniqueDir { .. })));
    }

    #[test]
    fn noexec_without_uid_fails() {
        let hal = FakeHal::new().with_uid(None);
        hal.mark_noexec("/tmp");
        let scratch = manager(&hal);

        assert!(matches!(
            scratch.payloads_dir().unwrap_err(),
            StageError::NoUserId
        ));
    }

    #[test]
    fn failed_mount_query_uses_temp_dir() {
        let hal = FakeHal::new();
        hal.fail_statfs("/tmp");
        let scratch = manager(&hal);

        assert!(!scratch.is_noexec(Path::new("/tmp")));
        assert!(scratch.payloads_dir().unwrap().starts_with("/tmp"));
    }

    #[test]
    fn creation_failure_is_wrapped() {
        let hal = FakeHal::new();
        hal.fail_unique_dirs();
        let scratch = manager(&hal);

        let err = scratch.payloads_dir().unwrap_err();

        assert!(matches!(err, StageError::CreateTempDir { .. }));
        assert_eq!(err.path(), Some(Path::new("/tmp")));
        assert!(std::error::Error::source(&err).is_some());
        assert!(scratch.cached().is_none());
    }

    #[test]
    fn payloads_subdir_failure_is_wrapped() {
        let hal = FakeHal::new();
        hal.fail_dir_all();
        let scratch = manager(&hal);

        let err = scratch.payloads_dir().unwrap_err();

        assert!(matches!(err, StageError::CreateDir { .. }));
        assert!(err.path().unwrap().ends_with("payloads"));
    }

    #[test]
    fn cleanup_removes_whole_scratch_tree() {
        let hal = FakeHal::new();
        let scratch = manager(&hal);
        let dir = scratch.payloads_dir().unwrap();
        let parent = dir.parent().unwrap().to_path_buf();

        scratch.cleanup();

        assert!(!hal.dir_exists(&dir));
        assert!(!hal.dir_exists(&parent));
        assert!(hal.dir_exists(Path::new("/tmp")));
        assert!(hal.has_operation(|op| matches!(
            op,
            Operation::RemoveDirAll { path } if *path == parent
        )));
    }

    #[test]
    fn cleanup_without_obtain_is_a_no_op() {
        let hal = FakeHal::new();
        let scratch = manager(&hal);

        scratch.cleanup();

        assert_eq!(hal.operation_count(), 0);
    }

    #[test]
    fn cleanup_keeps_cached_path_and_tolerates_repeats() {
        let hal = FakeHal::new();
        let scratch = manager(&hal);
        let dir = scratch.payloads_dir().unwrap();

        scratch.cleanup();
        scratch.cleanup();

        assert_eq!(scratch.cached(), Some(dir.clone()));
        assert_eq!(scratch.payloads_dir().unwrap(), dir);
        assert!(!hal.dir_exists(&dir));
    }

    #[test]
    fn reset_allows_a_fresh_directory() {
        let hal = FakeHal::new();
        let scratch = manager(&hal);
        let first = scratch.payloads_dir().unwrap();

        scratch.cleanup();
        scratch.reset();
        let second = scratch.payloads_dir().unwrap();

        assert_ne!(first, second);
        assert!(hal.dir_exists(&second));
    }
}
