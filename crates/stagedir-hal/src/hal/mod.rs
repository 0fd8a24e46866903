//! HAL trait definitions and implementations.
//!
//! This module defines the capability traits the scratch directory manager
//! needs and provides the native backend for the build target plus a fake
//! implementation for tests.

pub mod env_ops;
pub mod fake_hal;
pub mod fs_ops;
pub mod mount_flag_ops;
#[cfg(any(unix, windows))]
mod native_fs;
#[cfg(unix)]
pub mod unix_hal;
pub mod user_ops;
#[cfg(windows)]
pub mod windows_hal;

pub use env_ops::{EnvOps, SearchPathPolicy};
pub use fake_hal::{FakeHal, Operation};
pub use fs_ops::FsOps;
pub use mount_flag_ops::MountFlagOps;
#[cfg(unix)]
pub use unix_hal::UnixHal;
pub use user_ops::UserOps;
#[cfg(windows)]
pub use windows_hal::WindowsHal;

/// Backend for the platform this crate was built for.
#[cfg(unix)]
pub type NativeHal = UnixHal;

/// Backend for the platform this crate was built for.
#[cfg(windows)]
pub type NativeHal = WindowsHal;

/// Complete HAL combining all capability traits.
pub trait ScratchHal: MountFlagOps + FsOps + UserOps + EnvOps + Send + Sync {}

/// Automatically implement ScratchHal for any type implementing all required traits.
impl<T> ScratchHal for T where T: MountFlagOps + FsOps + UserOps + EnvOps + Send + Sync {}
