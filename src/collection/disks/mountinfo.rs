//! Parsing for the `/proc/<pid>/mountinfo` table.
//!
//! A line looks like:
//!
//! ```text
//! 36 35 98:0 /mnt1 /mnt2 rw,noatime master:1 - ext3 /dev/root rw,errors=continue
//! (1)(2)(3)   (4)   (5)      (6)      (7)   (8) (9)   (10)         (11)
//! ```
//!
//! Field 7 is a variable number of optional `tag:value` fields, which is why
//! the standalone `-` separator has to be searched for rather than indexed.
//! See `proc(5)` for details.

use crate::{
    collection::{
        disks::{PartitionStat, fix_mount_point, keep_partition, split_options},
        error::Interrupted,
    },
    utils::cancellation_token::CancellationToken,
};

const SEPARATOR: &str = "-";

/// Fields before the optional ones: id, parent id, major:minor, root,
/// mount point, mount options.
const LEADING_FIELDS: usize = 6;

/// Fields required after the separator: filesystem type and mount source.
/// The super block options come third but aren't used.
const MIN_TRAILING_FIELDS: usize = 2;

/// One structurally valid mountinfo line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct MountInfoEntry<'a> {
    pub(crate) major_minor: &'a str,
    pub(crate) root: &'a str,
    pub(crate) mount_point: &'a str,
    pub(crate) mount_options: &'a str,
    pub(crate) fs_type: &'a str,
    pub(crate) source: &'a str,
}

impl<'a> MountInfoEntry<'a> {
    /// Splits a line into its parts, or `None` if it doesn't have the shape of
    /// a mountinfo line.
    pub(crate) fn parse(line: &'a str) -> Option<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();

        let separator = fields
            .iter()
            .skip(LEADING_FIELDS)
            .position(|&f| f == SEPARATOR)?
            + LEADING_FIELDS;

        let trailing = &fields[separator + 1..];
        if trailing.len() < MIN_TRAILING_FIELDS {
            return None;
        }

        Some(Self {
            major_minor: fields[2],
            root: fields[3],
            mount_point: fields[4],
            mount_options: fields[5],
            fs_type: trailing[0],
            source: trailing[1],
        })
    }

    pub(crate) fn to_partition(&self) -> PartitionStat {
        PartitionStat::new(
            self.source,
            fix_mount_point(self.mount_point),
            self.fs_type,
            split_options(self.mount_options),
        )
    }
}

/// Parses mountinfo lines into partitions, in input order.
///
/// Lines that don't look like mountinfo lines are skipped. If `root_override`
/// is not empty, only mounts whose root matches it are considered.
///
/// `token` is checked before every line; if it reports done, the rows kept so
/// far are returned inside the [`Interrupted`] error.
pub fn parse_mountinfo<I, L, S>(
    token: &CancellationToken, lines: I, include_all: bool, allowed_fstypes: &[S],
    root_override: &str,
) -> Result<Vec<PartitionStat>, Interrupted>
where
    I: IntoIterator<Item = L>,
    L: AsRef<str>,
    S: AsRef<str>,
{
    parse_mountinfo_with(token, lines, include_all, allowed_fstypes, root_override, |_, _| {})
}

/// [`parse_mountinfo`], but `fixup` gets to adjust every kept partition while
/// the raw entry it came from is still around.
pub(crate) fn parse_mountinfo_with<I, L, S, F>(
    token: &CancellationToken, lines: I, include_all: bool, allowed_fstypes: &[S],
    root_override: &str, mut fixup: F,
) -> Result<Vec<PartitionStat>, Interrupted>
where
    I: IntoIterator<Item = L>,
    L: AsRef<str>,
    S: AsRef<str>,
    F: FnMut(&MountInfoEntry<'_>, &mut PartitionStat),
{
    let mut results = vec![];

    for line in lines {
        if let Err(reason) = token.check() {
            debug!("mountinfo parse stopped after {} rows: {reason}", results.len());
            return Err(Interrupted {
                reason,
                partial: results,
            });
        }

        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }

        let Some(entry) = MountInfoEntry::parse(line) else {
            trace!("skipping malformed mountinfo line: {line:?}");
            continue;
        };

        if !root_override.is_empty() && entry.root != root_override {
            continue;
        }

        let mut partition = entry.to_partition();
        if keep_partition(&partition, include_all, allowed_fstypes) {
            fixup(&entry, &mut partition);
            results.push(partition);
        }
    }

    Ok(results)
}
