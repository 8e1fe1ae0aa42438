use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use serde::Deserialize;

/// Where the host's kernel interfaces are mounted. Useful when running inside
/// a container with the host's `/proc` bind-mounted somewhere else.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct HostConfig {
    /// `HOST_PROC`.
    pub proc_path: PathBuf,

    /// `HOST_SYS`.
    pub sys_path: PathBuf,

    /// `HOST_DEV`.
    pub dev_path: PathBuf,

    /// If set, only mountinfo rows with this root are reported. Config only;
    /// no environment variable sets it.
    pub root_path: Option<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            proc_path: PathBuf::from("/proc"),
            sys_path: PathBuf::from("/sys"),
            dev_path: PathBuf::from("/dev"),
            root_path: None,
        }
    }
}

impl HostConfig {
    /// The default paths with any `HOST_*` environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var_os(key));
        config
    }

    /// Overrides paths with non-empty values returned by `lookup`.
    pub(crate) fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<OsString>) {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(path) = lookup("HOST_PROC") {
            self.proc_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("HOST_SYS") {
            self.sys_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("HOST_DEV") {
            self.dev_path = PathBuf::from(path);
        }
    }

    /// `path` relative to the host's procfs.
    #[inline]
    pub fn proc(&self, path: impl AsRef<Path>) -> PathBuf {
        self.proc_path.join(path)
    }

    /// `path` relative to the host's sysfs.
    #[inline]
    pub fn sys(&self, path: impl AsRef<Path>) -> PathBuf {
        self.sys_path.join(path)
    }

    /// `path` relative to the host's devtmpfs.
    #[inline]
    pub fn dev(&self, path: impl AsRef<Path>) -> PathBuf {
        self.dev_path.join(path)
    }

    /// The mountinfo root override, or `""` for none.
    #[inline]
    pub fn root_override(&self) -> &str {
        self.root_path.as_deref().unwrap_or_default()
    }
}
