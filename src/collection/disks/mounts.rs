//! Parsing for the `/proc/<pid>/mounts` table, used when mountinfo can't be
//! read.

use std::str::FromStr;

use anyhow::bail;

use crate::collection::disks::{PartitionStat, fix_mount_point, keep_partition, split_options};

impl FromStr for PartitionStat {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<PartitionStat> {
        // Example: `/dev/sda3 /home ext4 rw,relatime,data=ordered 0 0`
        let mut parts = line.split_whitespace();

        let Some(device) = parts.next() else {
            bail!("missing device");
        };
        let Some(mount_point) = parts.next() else {
            bail!("missing mount point");
        };
        let Some(fs_type) = parts.next() else {
            bail!("missing filesystem type");
        };
        let Some(options) = parts.next() else {
            bail!("missing mount options");
        };

        // The dump and pass columns are ignored.
        Ok(PartitionStat::new(
            device,
            fix_mount_point(mount_point),
            fs_type,
            split_options(options),
        ))
    }
}

/// Parses mounts lines into partitions, in input order.
///
/// Lines with fewer than four columns are skipped. There is no error case.
pub fn parse_mounts<I, L, S>(lines: I, include_all: bool, allowed_fstypes: &[S]) -> Vec<PartitionStat>
where
    I: IntoIterator<Item = L>,
    L: AsRef<str>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| match PartitionStat::from_str(line.as_ref()) {
            Ok(partition) => Some(partition),
            Err(err) => {
                if !line.as_ref().trim().is_empty() {
                    trace!("skipping mounts line {:?}: {err}", line.as_ref());
                }
                None
            }
        })
        .filter(|partition| keep_partition(partition, include_all, allowed_fstypes))
        .collect()
}
