//! Searching a catalog by the tract and patch of a tiling scheme.
//!
//! A tract/patch search is resolved once against the tiling scheme, then run
//! by the catalog engine in two phases:
//! 1. **Coarse**: partitions are pruned against the region's lon/lat
//!    boundary. This always runs.
//! 2. **Fine**: each surviving partition is filtered row by row against the
//!    inner or outer region. This runs only when `fine` is set; otherwise
//!    every row of the surviving partitions is kept.

use std::any::Any;
use std::fmt::{self, Display};

use super::polygon::polygon_filter;
use super::provider::SearchProvider;
use super::region::SearchRegion;
use crate::catalog::{Catalog, CatalogMetadata, PartitionStructure, PointFrame};
use crate::errors::SkyResult;
use crate::geometry::{LonLat, SkyRegion};
use crate::skymap::TilingScheme;

/// Which tract or patch to search, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TractPatchQuery {
    pub tract: u32,
    pub patch: Option<u32>,
    /// Filter individual rows, not just partitions.
    pub fine: bool,
    /// Use the non-overlapping inner boundary instead of the outer one.
    pub use_inner: bool,
}

impl Default for TractPatchQuery {
    fn default() -> Self {
        Self {
            tract: 0,
            patch: None,
            fine: true,
            use_inner: false,
        }
    }
}

impl TractPatchQuery {
    /// A fine search of a whole tract's outer polygon.
    pub fn tract(tract: u32) -> Self {
        Self {
            tract,
            ..Self::default()
        }
    }

    pub fn patch(mut self, patch: u32) -> Self {
        self.patch = Some(patch);
        self
    }

    pub fn fine(mut self, fine: bool) -> Self {
        self.fine = fine;
        self
    }

    pub fn use_inner(mut self, use_inner: bool) -> Self {
        self.use_inner = use_inner;
        self
    }
}

/// A resolved tract/patch search.
#[derive(Debug, Clone)]
pub struct TractPatchSearch {
    scheme_name: String,
    region: SearchRegion,
    fine: bool,
    use_inner: bool,
    coarse_boundary: Vec<LonLat>,
    fine_region: SkyRegion,
}

impl TractPatchSearch {
    /// Resolves the query's tract and patch.
    ///
    /// # Errors
    /// Returns [`SkyError::InvalidRegion`](crate::SkyError::InvalidRegion) if
    /// the tract or patch id is out of range.
    pub fn new(scheme: &dyn TilingScheme, query: TractPatchQuery) -> SkyResult<Self> {
        let region = SearchRegion::resolve(scheme, query.tract, query.patch)?;
        let coarse_boundary = region.coarse_boundary(query.use_inner);
        let fine_region = region.region(query.use_inner);
        log::debug!(
            "Resolved {} of {} (fine={}, use_inner={})",
            region,
            scheme.name(),
            query.fine,
            query.use_inner
        );
        Ok(Self {
            scheme_name: scheme.name().to_string(),
            region,
            fine: query.fine,
            use_inner: query.use_inner,
            coarse_boundary,
            fine_region,
        })
    }

    pub fn region(&self) -> &SearchRegion {
        &self.region
    }

    pub fn use_inner(&self) -> bool {
        self.use_inner
    }

    /// Lon/lat vertices used to prune partitions.
    pub fn coarse_boundary(&self) -> &[LonLat] {
        &self.coarse_boundary
    }

    /// Region rows are tested against in the fine phase.
    pub fn fine_region(&self) -> &SkyRegion {
        &self.fine_region
    }
}

impl SearchProvider for TractPatchSearch {
    fn fine(&self) -> bool {
        self.fine
    }

    fn filter_partitions(&self, structure: &PartitionStructure) -> SkyResult<PartitionStructure> {
        structure.filter_by_polygon(&self.coarse_boundary)
    }

    fn search_points(
        &self,
        frame: &PointFrame,
        metadata: &CatalogMetadata,
    ) -> SkyResult<PointFrame> {
        polygon_filter(frame, &self.fine_region, metadata)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Display for TractPatchSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TractPatchSearch({} of {}, fine={}, use_inner={})",
            self.region, self.scheme_name, self.fine, self.use_inner
        )
    }
}

impl Catalog {
    /// Narrows this catalog to a tract or patch of `scheme`.
    ///
    /// Resolution errors are returned before any partition is touched.
    pub fn tract_patch_search(
        &self,
        scheme: &dyn TilingScheme,
        query: TractPatchQuery,
    ) -> SkyResult<Catalog> {
        let search = TractPatchSearch::new(scheme, query)?;
        self.search(search)
    }
}
