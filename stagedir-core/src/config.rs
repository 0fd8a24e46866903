//! Scratch directory configuration.
//!
//! Every key is optional; a missing file section falls back to the defaults
//! below. Loaded from TOML, e.g.
//!
//! ```toml
//! prefix = "stagedir"
//! payloads-subdir = "payloads"
//! runtime-dir-base = "/run/user"
//! temp-root = "/var/tmp"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming a TOML config file for the process-wide default.
pub const CONFIG_ENV: &str = "STAGEDIR_CONFIG";

fn default_prefix() -> String {
    "stagedir".to_string()
}

fn default_payloads_subdir() -> String {
    "payloads".to_string()
}

fn default_runtime_dir_base() -> PathBuf {
    PathBuf::from("/run/user")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct ScratchConfig {
    /// Leading part of the generated scratch directory name.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Sub-folder of the scratch directory handed out to callers.
    #[serde(default = "default_payloads_subdir")]
    pub payloads_subdir: String,
    /// Parent of the per-user runtime directories (`<base>/<uid>`), used when
    /// the temp location is mounted `noexec`.
    #[serde(default = "default_runtime_dir_base")]
    pub runtime_dir_base: PathBuf,
    /// Overrides the platform default temp location.
    #[serde(default)]
    pub temp_root: Option<PathBuf>,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            payloads_subdir: default_payloads_subdir(),
            runtime_dir_base: default_runtime_dir_base(),
            temp_root: None,
        }
    }
}

impl ScratchConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("failed to parse scratch config TOML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config `{}`", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("failed to load config `{}`", path.display()))
    }

    /// Config named by `STAGEDIR_CONFIG`, or the defaults.
    ///
    /// A file that cannot be loaded is reported and replaced by the defaults.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::load(Path::new(&path)) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring {}: {:#}", CONFIG_ENV, err);
                Self::default()
            }
        }
    }

    /// Per-user runtime directory for `uid`.
    pub fn runtime_dir(&self, uid: u32) -> PathBuf {
        self.runtime_dir_base.join(uid.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_env;
    use std::env;
    use tempfile::tempdir;

    struct EnvVarGuard<'a> {
        key: &'a str,
        original: Option<std::ffi::OsString>,
    }

    impl<'a> EnvVarGuard<'a> {
        fn new(key: &'a str, value: &std::ffi::OsStr) -> Self {
            let original = env::var_os(key);
            env::set_var(key, value);
            Self { key, original }
        }
    }

    impl Drop for EnvVarGuard<'_> {
        fn drop(&mut self) {
            if let Some(ref original) = self.original {
                env::set_var(self.key, original);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = ScratchConfig::from_toml_str("").unwrap();
        assert_eq!(config, ScratchConfig::default());
        assert_eq!(config.prefix, "stagedir");
        assert_eq!(config.payloads_subdir, "payloads");
        assert_eq!(config.runtime_dir(1000), PathBuf::from("/run/user/1000"));
    }

    #[test]
    fn kebab_case_keys_override_defaults() {
        let config = ScratchConfig::from_toml_str(
            "prefix = \"ollama\"\npayloads-subdir = \"runners\"\ntemp-root = \"/var/tmp\"\n",
        )
        .unwrap();
        assert_eq!(config.prefix, "ollama");
        assert_eq!(config.payloads_subdir, "runners");
        assert_eq!(config.temp_root, Some(PathBuf::from("/var/tmp")));
        assert_eq!(config.runtime_dir_base, PathBuf::from("/run/user"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ScratchConfig::from_toml_str("payload_dir = \"x\"\n").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempdir().unwrap();
        let err = ScratchConfig::load(&dir.path().join("stagedir.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("stagedir.toml"));
    }

    #[test]
    fn from_env_reads_named_file() {
        let _lock = test_env::lock();
        let dir = tempdir().unwrap();
        let path = dir.path().join("stagedir.toml");
        fs::write(&path, "prefix = \"custom\"\n").unwrap();
        let _env = EnvVarGuard::new(CONFIG_ENV, path.as_os_str());

        assert_eq!(ScratchConfig::from_env().prefix, "custom");
    }

    #[test]
    fn from_env_falls_back_on_bad_file() {
        let _lock = test_env::lock();
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "prefix = [").unwrap();
        let _env = EnvVarGuard::new(CONFIG_ENV, path.as_os_str());

        assert_eq!(ScratchConfig::from_env(), ScratchConfig::default());
    }
}
