//! Process environment operations trait.

/// How a platform locates shared dependencies of staged payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPathPolicy {
    /// Prepend the payload directory to a search-path variable.
    Prepend {
        /// Environment variable holding the search path (e.g. `PATH`)
        var: &'static str,
        /// Separator between entries (e.g. `;`)
        separator: char,
    },
    /// Leave the environment alone; payloads find their libraries through a
    /// linker-embedded relative path.
    Rpath,
}

/// Trait for reading and writing process environment variables.
pub trait EnvOps {
    fn env_var(&self, name: &str) -> Option<String>;

    fn set_env_var(&self, name: &str, value: &str);

    fn search_path_policy(&self) -> SearchPathPolicy;
}
