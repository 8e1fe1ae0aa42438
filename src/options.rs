//! How the collection layer is pointed at the host and what it keeps.

pub mod config;

pub use config::{Config, disk::DiskConfig, host::HostConfig};
