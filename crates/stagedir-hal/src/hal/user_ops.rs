//! User identity (read-only).

/// User identity lookups.
pub trait UserOps {
    /// Numeric id of the current user, where the platform has one.
    fn current_uid(&self) -> Option<u32>;
}
