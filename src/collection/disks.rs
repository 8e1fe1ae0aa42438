//! Disk partition and I/O counter collection.
//!
//! The parsers in here are pure functions over already-read lines, so they
//! work (and are tested) on any platform. Reading the host's files is left to
//! the Linux-only [`linux`] layer.

pub mod device_name;
pub mod file_systems;
pub mod io_counters;
pub mod mountinfo;
pub mod mounts;
pub mod partition;

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        pub mod linux;
        pub use linux::{io_stats, partitions};
    }
}

pub use device_name::normalize_device_name;
pub use file_systems::parse_file_systems;
pub use io_counters::{IoCounters, accumulate_io_counters};
pub use mountinfo::parse_mountinfo;
pub use mounts::parse_mounts;
pub use partition::{PartitionStat, keep_partition};

/// Decodes the octal escapes the kernel writes into mount table paths.
pub(crate) fn fix_mount_point(s: &str) -> String {
    const ESCAPED_BACKSLASH: &str = "\\134";
    const ESCAPED_SPACE: &str = "\\040";
    const ESCAPED_TAB: &str = "\\011";
    const ESCAPED_NEWLINE: &str = "\\012";

    if !s.contains('\\') {
        return s.to_string();
    }

    s.replace(ESCAPED_SPACE, " ")
        .replace(ESCAPED_TAB, "\t")
        .replace(ESCAPED_NEWLINE, "\n")
        .replace(ESCAPED_BACKSLASH, "\\")
}

/// Splits a comma-separated option field, keeping source order and duplicates.
#[inline]
pub(crate) fn split_options(field: &str) -> Vec<String> {
    field.split(',').map(str::to_string).collect()
}
