pub use stagedir_error::{HalError, HalResult, StageError, StageResult};

/// Result type alias for stagedir front-end operations
pub type Result<T> = anyhow::Result<T>;
