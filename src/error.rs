//! Library-wide error type.
//!
//! The core never panics on a hardware failure; every fallible operation
//! that touches `/dev/mem` or validates a `HardwareConfig` returns a
//! [`Result`] built on this enum instead.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not open {path}: {source}")]
    DeviceOpen {
        path: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to map {region} at physical address {phys:#010x}: {source}")]
    Mmap {
        region: &'static str,
        phys: u64,
        #[source]
        source: io::Error,
    },

    #[error("invalid hardware configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
