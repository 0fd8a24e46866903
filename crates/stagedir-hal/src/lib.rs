//! stagedir Hardware Abstraction Layer (HAL).
//!
//! Everything that touches the host (mount flags, the filesystem, the user
//! identity and the process environment) goes through the traits defined
//! here, so the scratch directory logic stays portable and testable.

pub mod hal;

pub use hal::*;
pub use stagedir_error::{HalError, HalResult};
