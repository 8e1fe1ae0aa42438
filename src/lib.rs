//! Disk partition and I/O counter telemetry, read from the Linux kernel's
//! mount tables and `/proc/diskstats`.
//!
//! The parsers in [`collection::disks`] work on lines that have already been
//! read, so a caller can feed them from anywhere. [`collection::disks::partitions`]
//! and [`collection::disks::io_stats`] do the reading on Linux, pointed at the
//! host through [`options::Config`].
//!
//! ```
//! use partstat::{collection::disks::parse_mountinfo, utils::cancellation_token::CancellationToken};
//!
//! let lines = [
//!     "111 80 0:22 / /sys rw,nosuid,nodev,noexec,noatime shared:15 - sysfs sysfs rw",
//!     "114 80 0:61 / /run rw,nosuid,nodev shared:18 - tmpfs none rw,mode=755",
//! ];
//! let token = CancellationToken::new();
//!
//! let partitions = parse_mountinfo(&token, lines, false, &["sysfs", "tmpfs"], "").unwrap();
//! assert_eq!(partitions.len(), 1);
//! assert_eq!(partitions[0].mountpoint, "/sys");
//! ```

#![warn(rust_2018_idioms)]

#[macro_use]
extern crate log;

pub mod collection;
pub mod options;

pub mod utils {
    pub mod cancellation_token;
    pub mod logging;
}
