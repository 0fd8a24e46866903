//! Search-path adjustment for platforms that locate payload libraries through
//! an environment variable (Windows `PATH`).
//!
//! Paths are compared as strings, splitting on both `\` and `/`, so the
//! rewrite behaves the same whichever host runs it.

use log::{debug, info};
use stagedir_hal::{EnvOps, SearchPathPolicy};
use std::path::Path;

const SEPARATORS: [char; 2] = ['\\', '/'];

fn trim_separators(path: &str) -> &str {
    let trimmed = path.trim_end_matches(SEPARATORS);
    if trimmed.is_empty() {
        path
    } else {
        trimmed
    }
}

/// Parent of `dir`, unless that parent is a filesystem or drive root.
fn scratch_parent(dir: &str) -> Option<&str> {
    let (parent, _) = trim_separators(dir).rsplit_once(SEPARATORS)?;
    if parent.is_empty() || parent.ends_with(':') {
        return None;
    }
    Some(parent)
}

fn is_under(entry: &str, parent: &str) -> bool {
    match entry.strip_prefix(parent) {
        Some("") => true,
        Some(rest) => rest.starts_with(SEPARATORS),
        None => false,
    }
}

/// Rebuild a search-path value with `dir` first.
///
/// Entries equal to `dir`, or lying under `dir`'s parent, are dropped (both
/// compared case-insensitively); every other non-empty entry keeps its
/// relative order.
pub fn rewrite_search_path(current: &str, dir: &str, separator: char) -> String {
    let target = trim_separators(dir).to_lowercase();
    let parent = scratch_parent(dir).map(str::to_lowercase);

    let kept = current.split(separator).filter(|entry| {
        if entry.is_empty() {
            return false;
        }
        let entry = trim_separators(entry).to_lowercase();
        if entry == target {
            return false;
        }
        !matches!(&parent, Some(parent) if is_under(&entry, parent))
    });

    let mut components = vec![dir];
    components.extend(kept);
    components.join(&separator.to_string())
}

/// Apply the HAL's search-path policy for the payload directory `dir`.
pub fn update_search_path<H: EnvOps + ?Sized>(hal: &H, dir: &Path) {
    match hal.search_path_policy() {
        SearchPathPolicy::Rpath => {
            debug!(
                "search path left unchanged for {}; payloads rely on rpath",
                dir.display()
            );
        }
        SearchPathPolicy::Prepend { var, separator } => {
            let current = hal.env_var(var).unwrap_or_default();
            let updated = rewrite_search_path(&current, &dir.to_string_lossy(), separator);
            info!("Updating {} to {}", var, updated);
            hal.set_env_var(var, &updated);
        }
    }
}
