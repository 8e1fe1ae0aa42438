//! Based on [heim's implementation](https://github.com/heim-rs/heim/blob/master/heim-disk/src/sys/linux/counters.rs).

use std::{io, num::ParseIntError, str::FromStr};

use hashbrown::HashMap;
use serde::Serialize;

use crate::{
    collection::{
        disks::normalize_device_name,
        error::CollectionResult,
    },
    utils::cancellation_token::CancellationToken,
};

/// Copied from the `psutil` sources:
///
/// "man iostat" states that sectors are equivalent with blocks and have
/// a size of 512 bytes. Despite this value can be queried at runtime
/// via /sys/block/{DISK}/queue/hw_sector_size and results may vary
/// between 1k, 2k, or 4k... 512 appears to be a magic constant used
/// throughout Linux source code:
/// * <https://stackoverflow.com/a/38136179/376587>
/// * <https://lists.gt.net/linux/kernel/2241060>
/// * <https://github.com/giampaolo/psutil/issues/1305>
/// * <https://github.com/torvalds/linux/blob/4f671fe2f9523a1ea206f63fe60a7c7b3a56d5c7/include/linux/bio.h#L99>
/// * <https://lkml.org/lkml/2015/8/17/234>
const DISK_SECTOR_SIZE: u64 = 512;

/// Cumulative I/O counters for one block device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IoCounters {
    pub name: String,
    pub read_count: u64,
    pub merged_read_count: u64,
    pub write_count: u64,
    pub merged_write_count: u64,
    pub read_bytes: u64,
    pub write_bytes: u64,
    /// Milliseconds spent reading.
    pub read_time: u64,
    /// Milliseconds spent writing.
    pub write_time: u64,
    pub iops_in_progress: u64,
    /// Milliseconds spent doing I/O.
    pub io_time: u64,
    pub weighted_io: u64,
}

impl IoCounters {
    /// Adds `other`'s counters onto this one. The name is left alone.
    fn accumulate(&mut self, other: &IoCounters) {
        self.read_count = self.read_count.saturating_add(other.read_count);
        self.merged_read_count = self.merged_read_count.saturating_add(other.merged_read_count);
        self.write_count = self.write_count.saturating_add(other.write_count);
        self.merged_write_count = self.merged_write_count.saturating_add(other.merged_write_count);
        self.read_bytes = self.read_bytes.saturating_add(other.read_bytes);
        self.write_bytes = self.write_bytes.saturating_add(other.write_bytes);
        self.read_time = self.read_time.saturating_add(other.read_time);
        self.write_time = self.write_time.saturating_add(other.write_time);
        self.iops_in_progress = self.iops_in_progress.saturating_add(other.iops_in_progress);
        self.io_time = self.io_time.saturating_add(other.io_time);
        self.weighted_io = self.weighted_io.saturating_add(other.weighted_io);
    }
}

impl FromStr for IoCounters {
    type Err = anyhow::Error;

    /// Converts a `&str` to an [`IoCounters`].
    ///
    /// Follows the format used in Linux 2.6+. Note that this completely ignores
    /// the following stats:
    /// - Discard stats from 4.18+
    /// - Flush stats from 5.5+
    ///
    /// <https://www.kernel.org/doc/Documentation/iostats.txt>
    /// <https://www.kernel.org/doc/Documentation/ABI/testing/procfs-diskstats>
    fn from_str(s: &str) -> anyhow::Result<IoCounters> {
        fn next_part<'a>(iter: &mut impl Iterator<Item = &'a str>) -> Result<&'a str, io::Error> {
            iter.next()
                .ok_or_else(|| io::Error::from(io::ErrorKind::InvalidData))
        }

        fn next_part_to_u64<'a>(iter: &mut impl Iterator<Item = &'a str>) -> anyhow::Result<u64> {
            next_part(iter)?
                .parse()
                .map_err(|err: ParseIntError| err.into())
        }

        // Skip the major and minor numbers.
        let mut parts = s.split_whitespace().skip(2);

        let name = next_part(&mut parts)?.to_string();

        Ok(IoCounters {
            name,
            read_count: next_part_to_u64(&mut parts)?,
            merged_read_count: next_part_to_u64(&mut parts)?,
            read_bytes: next_part_to_u64(&mut parts)?.saturating_mul(DISK_SECTOR_SIZE),
            read_time: next_part_to_u64(&mut parts)?,
            write_count: next_part_to_u64(&mut parts)?,
            merged_write_count: next_part_to_u64(&mut parts)?,
            write_bytes: next_part_to_u64(&mut parts)?.saturating_mul(DISK_SECTOR_SIZE),
            write_time: next_part_to_u64(&mut parts)?,
            iops_in_progress: next_part_to_u64(&mut parts)?,
            io_time: next_part_to_u64(&mut parts)?,
            weighted_io: next_part_to_u64(&mut parts)?,
        })
    }
}

/// Parses `/proc/diskstats` lines and sums the counters per device, keyed by
/// the normalized device name (see [`normalize_device_name`]).
///
/// If `names` is non-empty, only devices whose normalized name is listed are
/// kept. Lines that don't parse are skipped. `token` is checked before every
/// line.
pub fn accumulate_io_counters<I, L, S>(
    token: &CancellationToken, lines: I, names: &[S],
) -> CollectionResult<HashMap<String, IoCounters>>
where
    I: IntoIterator<Item = L>,
    L: AsRef<str>,
    S: AsRef<str>,
{
    let mut results: HashMap<String, IoCounters> = HashMap::new();

    for line in lines {
        token.check()?;

        let line = line.as_ref();
        let Ok(counters) = IoCounters::from_str(line) else {
            if !line.trim().is_empty() {
                trace!("skipping diskstats line: {line:?}");
            }
            continue;
        };

        let name = normalize_device_name(&counters.name);
        if !names.is_empty() && !names.iter().any(|n| n.as_ref() == name) {
            continue;
        }

        match results.get_mut(name.as_ref()) {
            Some(existing) => existing.accumulate(&counters),
            None => {
                let name = name.into_owned();
                results.insert(
                    name.clone(),
                    IoCounters {
                        name,
                        ..counters
                    },
                );
            }
        }
    }

    Ok(results)
}
