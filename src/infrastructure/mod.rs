//! Storage adapters for the domain ports, plus the demo data loaded at start.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod seed;
