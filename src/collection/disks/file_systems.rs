//! Parsing for `/proc/filesystems`, which lists the filesystem types the
//! running kernel supports.
//!
//! ```text
//! nodev	sysfs
//! nodev	tmpfs
//! 	ext4
//! nodev	zfs
//! ```

use std::str::FromStr;

use anyhow::bail;

/// Types flagged `nodev` that still sit on real disks.
const BLOCK_BACKED_NODEV: &[&str] = &["zfs"];

/// One line of `/proc/filesystems`.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct FileSystemEntry {
    name: String,
    nodev: bool,
}

impl FileSystemEntry {
    /// Returns the filesystem type name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks if the kernel says this filesystem needs no block device (such
    /// as `tmpfs` or `proc`).
    #[inline]
    pub fn is_virtual(&self) -> bool {
        self.nodev && !BLOCK_BACKED_NODEV.contains(&self.name.as_str())
    }

    /// Checks if filesystem is used for a physical devices.
    #[inline]
    pub fn is_physical(&self) -> bool {
        !self.is_virtual()
    }
}

impl FromStr for FileSystemEntry {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut parts = line.split_whitespace();

        let (nodev, name) = match (parts.next(), parts.next()) {
            (Some("nodev"), Some(name)) => (true, name),
            (Some(name), None) => (false, name),
            (Some(flag), Some(_)) => bail!("unknown filesystem flag '{flag}'"),
            (None, _) => bail!("empty line"),
        };

        Ok(FileSystemEntry {
            name: name.to_string(),
            nodev,
        })
    }
}

/// Returns the names of the physical filesystems listed in `content`, in file
/// order. This is the default allow-list for partition filtering.
pub fn parse_file_systems(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| FileSystemEntry::from_str(line).ok())
        .filter(FileSystemEntry::is_physical)
        .map(|entry| entry.name)
        .collect()
}
