//! # Skytract - Tract and Patch Search for Partitioned Sky Catalogs
//!
//! This crate selects the rows of a hierarchically partitioned astronomical
//! catalog that fall inside a tract, or a patch of a tract, of a sky tiling
//! scheme.
//!
//! ## Features
//!
//! - **Two-Phase Search**: conservative partition pruning against the region's
//!   lon/lat boundary, followed by an optional exact per-row membership test
//! - **Inner/Outer Boundaries**: search the non-overlapping inner region or the
//!   overlapping outer polygon of a tract or patch
//! - **Rings Skymap**: a ring-based tiling of the sphere into tracts and
//!   patches on gnomonic pixel grids
//! - **HTM Partitioning**: an in-memory catalog engine that partitions rows by
//!   trixel and evaluates searches lazily and in parallel
//! - **Wrap and Pole Safe**: all membership tests run on unit vectors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skytract::{
//!     Catalog, CatalogMetadata, PointFrame, RingsSkyMap, RingsSkyMapConfig, TractPatchQuery,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let skymap = RingsSkyMap::new(RingsSkyMapConfig::default())?;
//!
//! let metadata = CatalogMetadata::new("objects");
//! let frame = PointFrame::from_positions(
//!     vec![1, 2, 3],
//!     vec![337.1, 337.5, 120.0],
//!     vec![-67.5, -67.8, 10.0],
//!     &metadata,
//! )?;
//! let catalog = Catalog::from_frame(metadata, frame)?;
//!
//! // Rows inside patch 62 of tract 792, using the patch's outer polygon
//! let rows = catalog
//!     .tract_patch_search(&skymap, TractPatchQuery::tract(792).patch(62))?
//!     .compute()?;
//! println!("{} rows", rows.len());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod errors;
pub mod geometry;
pub mod search;
pub mod skymap;

// Re-export error types
pub use errors::{SkyError, SkyResult};

// Re-export geometry types
pub use geometry::{ConvexPolygon, LonLat, LonLatBox, SkyRegion};

// Re-export skymap types
pub use skymap::{PatchInfo, RingsSkyMap, RingsSkyMapConfig, TilingScheme, TractInfo};

// Re-export catalog types
pub use catalog::{Catalog, CatalogMetadata, PartitionStructure, PointFrame};

// Re-export search types
pub use search::{
    polygon_filter, PolygonSearch, Search, SearchProvider, SearchRegion, TractPatchQuery,
    TractPatchSearch,
};
