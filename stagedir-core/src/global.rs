//! Process-wide scratch directory backed by the native HAL.
//!
//! Built on first use with the config named by `STAGEDIR_CONFIG`. Code that
//! needs its own lifetime or a fake HAL should hold a [`ScratchDirs`] instead.

use crate::config::ScratchConfig;
use crate::scratch::ScratchDirs;
use once_cell::sync::Lazy;
use stagedir_error::StageResult;
use stagedir_hal::NativeHal;
use std::path::{Path, PathBuf};

static SCRATCH: Lazy<ScratchDirs<NativeHal>> =
    Lazy::new(|| ScratchDirs::new(NativeHal::new(), ScratchConfig::from_env()));

pub fn scratch() -> &'static ScratchDirs<NativeHal> {
    &SCRATCH
}

/// See [`ScratchDirs::payloads_dir`].
pub fn payloads_dir() -> StageResult<PathBuf> {
    SCRATCH.payloads_dir()
}

pub fn is_noexec(path: &Path) -> bool {
    SCRATCH.is_noexec(path)
}

pub fn cleanup() {
    SCRATCH.cleanup()
}

pub fn update_path(dir: &Path) {
    SCRATCH.update_search_path(dir)
}
