//! Reads the host's mount and disk tables. Linux-only.

mod counters;
mod partition;

pub use counters::io_stats;
pub use partition::partitions;
