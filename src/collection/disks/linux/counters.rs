use anyhow::Context;
use hashbrown::HashMap;

use crate::{
    collection::disks::{IoCounters, accumulate_io_counters},
    options::Config,
    utils::cancellation_token::CancellationToken,
};

/// Returns the I/O counters of every block device, keyed by normalized device
/// name. Pulls data from `<proc>/diskstats`.
pub fn io_stats(
    token: &CancellationToken, config: &Config,
) -> anyhow::Result<HashMap<String, IoCounters>> {
    let path = config.host.proc("diskstats");
    let content =
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;

    let results = accumulate_io_counters(token, content.lines(), &config.disk.io_devices)?;
    debug!("collected I/O counters for {} devices", results.len());

    Ok(results)
}
