//! Snapshot stores for the metadata cache.

pub mod json;
pub mod memory;

pub use json::JsonSnapshotStore;
pub use memory::MemorySnapshotStore;
