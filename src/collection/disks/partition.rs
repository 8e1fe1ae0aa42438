use serde::{Deserialize, Serialize};

/// The device token the kernel uses for mounts with no backing device.
const NO_DEVICE: &str = "none";

/// Representation of one mounted filesystem, regardless of which mount table
/// it was read from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionStat {
    /// Source device, or a placeholder such as `none` or `sysfs`.
    pub device: String,
    /// Where the filesystem is attached.
    pub mountpoint: String,
    /// The filesystem type, e.g. `ext4` or `tmpfs`.
    pub fstype: String,
    /// Mount options in source order. Duplicates are kept.
    pub opts: Vec<String>,
}

impl PartitionStat {
    pub fn new(
        device: impl Into<String>, mountpoint: impl Into<String>, fstype: impl Into<String>,
        opts: Vec<String>,
    ) -> Self {
        Self {
            device: device.into(),
            mountpoint: mountpoint.into(),
            fstype: fstype.into(),
            opts,
        }
    }

    /// Whether the given option was set for this mount.
    #[inline]
    pub fn has_opt(&self, opt: &str) -> bool {
        self.opts.iter().any(|o| o == opt)
    }
}

/// Whether a parsed partition should be handed back to the caller.
///
/// With `include_all` set everything is kept. Otherwise the filesystem type
/// must be one of `allowed_fstypes` (exact, case-sensitive) and the mount
/// must have a real device, i.e. not the `none` placeholder. Which types
/// are allowed is up to the caller.
pub fn keep_partition<S: AsRef<str>>(
    partition: &PartitionStat, include_all: bool, allowed_fstypes: &[S],
) -> bool {
    if include_all {
        return true;
    }

    partition.device != NO_DEVICE
        && allowed_fstypes
            .iter()
            .any(|fs| fs.as_ref() == partition.fstype)
}
