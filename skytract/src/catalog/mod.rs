//! An in-memory, HTM-partitioned catalog engine.
//!
//! Rows are grouped into partitions by the trixel holding their position.
//! A search first prunes whole partitions against a boundary, then filters
//! the rows of the surviving partitions.

mod engine;
mod frame;
mod htm;
mod metadata;
mod partition;

pub use engine::Catalog;
pub use frame::PointFrame;
pub use htm::Trixel;
pub use metadata::{CatalogMetadata, MAX_PARTITION_DEPTH};
pub use partition::{PartitionInfo, PartitionStructure};
