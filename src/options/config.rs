pub mod disk;
pub mod host;

use std::{ffi::OsString, fs, path::Path};

use serde::Deserialize;

use self::{disk::DiskConfig, host::HostConfig};
use crate::collection::error::{CollectionError, CollectionResult};

/// The full configuration, as read from a TOML file.
///
/// ```toml
/// [host]
/// proc_path = "/host/proc"
///
/// [disk]
/// include_all = false
/// fstypes = ["ext4", "xfs"]
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct Config {
    #[serde(default)]
    pub host: HostConfig,

    #[serde(default)]
    pub disk: DiskConfig,
}

impl Config {
    /// Parses a TOML config.
    pub fn from_toml_str(config: &str) -> CollectionResult<Self> {
        Ok(toml_edit::de::from_str(config)?)
    }

    /// Reads and parses a TOML config file.
    pub fn read(path: &Path) -> CollectionResult<Self> {
        let content = fs::read_to_string(path).map_err(|err| {
            CollectionError::config(format!("couldn't read '{}': {err}", path.display()))
        })?;

        Self::from_toml_str(&content)
    }

    /// Applies the `HOST_*` environment overrides on top of this config.
    pub fn with_env(mut self) -> Self {
        self.host.apply_env(|key| std::env::var_os(key));
        self
    }

    /// Like [`Config::with_env`], but with a custom variable lookup.
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        self.host.apply_env(lookup);
        self
    }
}
