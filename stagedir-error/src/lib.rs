use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type HalResult<T> = Result<T, HalError>;
pub type StageResult<T> = Result<T, StageError>;

#[derive(Error, Debug)]
pub enum HalError {
    #[error("Permission denied")]
    PermissionDenied,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[cfg(unix)]
    #[error("nix errno: {0}")]
    Nix(#[from] nix::errno::Errno),

    #[error("{0}")]
    Other(String),
}

impl HalError {
    /// True when the underlying cause is a missing file or directory.
    pub fn is_not_found(&self) -> bool {
        match self {
            HalError::Io(err) => err.kind() == io::ErrorKind::NotFound,
            #[cfg(unix)]
            HalError::Nix(errno) => *errno == nix::errno::Errno::ENOENT,
            _ => false,
        }
    }
}

/// Errors raised while resolving the payloads directory.
///
/// Every variant except `NoUserId` is a filesystem failure and carries the
/// path involved plus the wrapped OS cause.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("run user directory {} does not exist: {source}", path.display())]
    RuntimeDirMissing {
        path: PathBuf,
        #[source]
        source: HalError,
    },

    #[error("failed to generate tmp dir in {}: {source}", parent.display())]
    CreateTempDir {
        parent: PathBuf,
        #[source]
        source: HalError,
    },

    #[error("failed to create payloads dir {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: HalError,
    },

    #[error("no user id available to locate a per-user runtime directory")]
    NoUserId,
}

impl StageError {
    /// Path the failure refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            StageError::RuntimeDirMissing { path, .. } | StageError::CreateDir { path, .. } => {
                Some(path)
            }
            StageError::CreateTempDir { parent, .. } => Some(parent),
            StageError::NoUserId => None,
        }
    }

    pub fn is_filesystem(&self) -> bool {
        !matches!(self, StageError::NoUserId)
    }
}
