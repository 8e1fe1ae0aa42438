use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::Context;

use crate::{
    collection::{
        disks::{PartitionStat, mountinfo::parse_mountinfo_with, parse_file_systems, parse_mounts},
        linux::utils::read_link,
    },
    options::{Config, HostConfig},
    utils::cancellation_token::CancellationToken,
};

const DEV: &str = "/dev";
const DEV_MAPPER: &str = "/dev/mapper/";
const DEV_ROOT: &str = "/dev/root";

/// Returns the mounted partitions of the host, in mount table order.
///
/// `<proc>/1/mountinfo` is preferred; if it can't be read, `<proc>/self/mounts`
/// is used instead. Unless `include_all` is set in the disk config, only the
/// configured filesystem types are kept, which default to the physical ones
/// listed in `<proc>/filesystems`.
///
/// If `token` reports done while reading mountinfo, the returned error wraps a
/// [`Interrupted`](crate::collection::error::Interrupted) holding the rows
/// kept so far.
pub fn partitions(token: &CancellationToken, config: &Config) -> anyhow::Result<Vec<PartitionStat>> {
    let host = &config.host;
    let include_all = config.disk.include_all;

    let allowed = match &config.disk.fstypes {
        Some(fstypes) => fstypes.clone(),
        None if include_all => Vec::new(),
        None => {
            let path = host.proc("filesystems");
            let content =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            parse_file_systems(&content)
        }
    };

    let mut resolver = DeviceResolver::new(host);
    let mountinfo = host.proc("1/mountinfo");

    match fs::read_to_string(&mountinfo) {
        Ok(content) => {
            let results = parse_mountinfo_with(
                token,
                content.lines(),
                include_all,
                &allowed,
                host.root_override(),
                |entry, partition| resolver.resolve(partition, Some(entry.major_minor)),
            )?;
            debug!("read {} partitions from {}", results.len(), mountinfo.display());

            Ok(results)
        }
        Err(err) => {
            debug!("couldn't read {}, falling back to mounts: {err}", mountinfo.display());

            let path = host.proc("self/mounts");
            let content =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            token.check()?;

            let mut results = parse_mounts(content.lines(), include_all, &allowed);
            for partition in &mut results {
                resolver.resolve(partition, None);
            }
            debug!("read {} partitions from {}", results.len(), path.display());

            Ok(results)
        }
    }
}

/// Maps placeholder or indirect device names to the real device node.
struct DeviceResolver<'a> {
    host: &'a HostConfig,
    buffer: Vec<u8>,
}

impl<'a> DeviceResolver<'a> {
    fn new(host: &'a HostConfig) -> Self {
        Self {
            host,
            buffer: Vec::new(),
        }
    }

    fn resolve(&mut self, partition: &mut PartitionStat, major_minor: Option<&str>) {
        // Device mapper names are symlinks to the `dm-N` node, which is what
        // shows up in diskstats.
        if let Some(name) = partition.device.strip_prefix(DEV_MAPPER) {
            if let Some(device) = self.resolve_mapper(name) {
                partition.device = device;
            }
        }

        // `/dev/root` isn't a real device; find it through its major:minor.
        if partition.device == DEV_ROOT {
            if let Some(major_minor) = major_minor {
                let link = self.host.sys("dev/block").join(major_minor);
                if let Ok(target) = read_link(&link, &mut self.buffer) {
                    if let Some(name) = Path::new(target.as_ref()).file_name() {
                        partition.device = format!("/dev/{}", name.to_string_lossy());
                    }
                }
            }
        }
    }

    /// Follows `<dev>/mapper/<name>` within the host's dev tree. Absolute
    /// targets are taken as `/dev` paths, not paths on this machine.
    fn resolve_mapper(&mut self, name: &str) -> Option<String> {
        let link = self.host.dev("mapper").join(name);
        let target = read_link(&link, &mut self.buffer).ok()?;
        let target = Path::new(target.as_ref());

        let relative = match target.strip_prefix(DEV) {
            Ok(rest) => rest.to_path_buf(),
            Err(_) if target.is_absolute() => return None,
            Err(_) => Path::new("mapper").join(target),
        };

        let mut resolved = PathBuf::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::ParentDir => {
                    resolved.pop();
                }
                _ => {}
            }
        }

        if resolved.as_os_str().is_empty() || !self.host.dev(&resolved).exists() {
            return None;
        }

        Some(Path::new(DEV).join(resolved).to_string_lossy().into_owned())
    }
}
