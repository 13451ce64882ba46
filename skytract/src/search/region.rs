use std::fmt::{self, Display};
use std::sync::Arc;

use crate::errors::SkyResult;
use crate::geometry::{LonLat, SkyRegion};
use crate::skymap::{PatchInfo, TilingScheme, TractInfo};

/// A resolved tract, or a patch within a tract.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchRegion {
    Tract(Arc<TractInfo>),
    Patch {
        tract: Arc<TractInfo>,
        patch: PatchInfo,
    },
}

impl SearchRegion {
    /// Resolves a tract, and a patch within it when `patch_id` is given.
    ///
    /// # Errors
    /// Returns [`SkyError::InvalidRegion`](crate::SkyError::InvalidRegion) if
    /// either id is out of range.
    pub fn resolve(
        scheme: &dyn TilingScheme,
        tract_id: u32,
        patch_id: Option<u32>,
    ) -> SkyResult<SearchRegion> {
        let tract = scheme.tract(tract_id)?;
        match patch_id {
            None => Ok(SearchRegion::Tract(tract)),
            Some(patch_id) => {
                let patch = tract.patch(patch_id)?;
                Ok(SearchRegion::Patch { tract, patch })
            }
        }
    }

    pub fn tract(&self) -> &TractInfo {
        match self {
            SearchRegion::Tract(tract) => tract,
            SearchRegion::Patch { tract, .. } => tract,
        }
    }

    pub fn patch(&self) -> Option<&PatchInfo> {
        match self {
            SearchRegion::Tract(_) => None,
            SearchRegion::Patch { patch, .. } => Some(patch),
        }
    }

    /// The region's defining vertices in lon/lat.
    ///
    /// A tract reports its raw vertex list; a patch its inner polygon.
    pub fn raw_boundary(&self) -> Vec<LonLat> {
        match self {
            SearchRegion::Tract(tract) => tract.vertex_list().to_vec(),
            SearchRegion::Patch { patch, .. } => patch.inner_sky_polygon().lonlat_vertices(),
        }
    }

    /// Boundary used to prune partitions.
    ///
    /// It always covers the region searched by
    /// [`region(use_inner)`](SearchRegion::region): the tract vertex list
    /// covers the tract's outer polygon and hence its inner region, and a
    /// patch reports the same polygon its point filter uses.
    pub fn coarse_boundary(&self, use_inner: bool) -> Vec<LonLat> {
        match self {
            SearchRegion::Tract(tract) => tract.vertex_list().to_vec(),
            SearchRegion::Patch { patch, .. } if use_inner => {
                patch.inner_sky_polygon().lonlat_vertices()
            }
            SearchRegion::Patch { patch, .. } => patch.outer_sky_polygon().lonlat_vertices(),
        }
    }

    /// The non-overlapping region: tract inner box or patch inner polygon.
    pub fn inner_region(&self) -> SkyRegion {
        match self {
            SearchRegion::Tract(tract) => tract.inner_sky_region().clone(),
            SearchRegion::Patch { patch, .. } => patch.sky_region(true),
        }
    }

    /// The overlapping region: tract or patch outer polygon.
    pub fn outer_region(&self) -> SkyRegion {
        match self {
            SearchRegion::Tract(tract) => SkyRegion::Polygon(tract.outer_sky_polygon().clone()),
            SearchRegion::Patch { patch, .. } => patch.sky_region(false),
        }
    }

    pub fn region(&self, use_inner: bool) -> SkyRegion {
        if use_inner {
            self.inner_region()
        } else {
            self.outer_region()
        }
    }
}

impl Display for SearchRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchRegion::Tract(tract) => write!(f, "tract {}", tract.id()),
            SearchRegion::Patch { tract, patch } => {
                write!(f, "tract {} patch {}", tract.id(), patch.index())
            }
        }
    }
}
