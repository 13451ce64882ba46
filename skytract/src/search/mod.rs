//! Region searches over a partitioned catalog.
//!
//! Every search implements [`SearchProvider`], the two-phase contract the
//! catalog engine drives: partition pruning, then optional row filtering.
//! [`TractPatchSearch`] searches a tract or patch of a tiling scheme and
//! [`PolygonSearch`] a free-form region.

mod polygon;
mod provider;
mod region;
mod tract_patch;

pub use polygon::{polygon_filter, PolygonSearch};
pub use provider::{Search, SearchProvider};
pub use region::SearchRegion;
pub use tract_patch::{TractPatchQuery, TractPatchSearch};
