//! This is the main file to house data collection functions.

#[cfg(target_os = "linux")]
mod linux {
    pub mod utils;
}

pub mod disks;
pub mod error;
