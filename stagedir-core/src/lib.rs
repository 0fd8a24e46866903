//! stagedir core library.
//!
//! Resolves a single scratch directory for staging executable payloads,
//! falling back to the per-user runtime directory when the default temp
//! location is mounted `noexec`.

pub mod config;
pub mod errors;
pub mod global;
pub mod guard;
pub mod logging;
pub mod scratch;
pub mod search_path;
#[cfg(test)]
pub(crate) mod test_env;

pub use config::ScratchConfig;
pub use errors::{Result, StageError, StageResult};
pub use global::{cleanup, is_noexec, payloads_dir, scratch, update_path};
pub use guard::ScratchGuard;
pub use scratch::ScratchDirs;
pub use stagedir_hal as hal;
