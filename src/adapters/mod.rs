// Adapters layer: concrete implementations of the domain ports.

pub mod report;
pub mod snapshot;

pub use snapshot::{DatabaseSnapshot, SnapshotStore};
