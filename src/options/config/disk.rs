use serde::Deserialize;

/// Disk configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct DiskConfig {
    /// Report every mount, pseudo filesystems included.
    pub include_all: bool,

    /// Filesystem types to keep when `include_all` is off. If unset, the
    /// physical filesystems from `/proc/filesystems` are used.
    pub fstypes: Option<Vec<String>>,

    /// Only report I/O counters for these (normalized) device names. Empty
    /// means all devices.
    pub io_devices: Vec<String>,
}
