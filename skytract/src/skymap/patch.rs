use std::fmt::{self, Display};

use crate::geometry::{ConvexPolygon, SkyRegion};

/// Geometry of one patch within a tract.
///
/// The inner polygon is the patch's own cell of the tract grid and does not
/// overlap neighbouring patches. The outer polygon grows the cell by the
/// patch border.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchInfo {
    index: u32,
    grid_index: [u32; 2],
    inner_sky_polygon: ConvexPolygon,
    outer_sky_polygon: ConvexPolygon,
}

impl PatchInfo {
    pub(crate) fn new(
        index: u32,
        grid_index: [u32; 2],
        inner_sky_polygon: ConvexPolygon,
        outer_sky_polygon: ConvexPolygon,
    ) -> Self {
        Self {
            index,
            grid_index,
            inner_sky_polygon,
            outer_sky_polygon,
        }
    }

    /// Sequential index within the tract, `y * nx + x`.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Position in the tract's patch grid as `[x, y]`.
    pub fn grid_index(&self) -> [u32; 2] {
        self.grid_index
    }

    pub fn inner_sky_polygon(&self) -> &ConvexPolygon {
        &self.inner_sky_polygon
    }

    pub fn outer_sky_polygon(&self) -> &ConvexPolygon {
        &self.outer_sky_polygon
    }

    /// Inner or outer boundary as a [`SkyRegion`].
    pub fn sky_region(&self, use_inner: bool) -> SkyRegion {
        if use_inner {
            SkyRegion::Polygon(self.inner_sky_polygon.clone())
        } else {
            SkyRegion::Polygon(self.outer_sky_polygon.clone())
        }
    }
}

impl Display for PatchInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Patch({}, [{}, {}])",
            self.index, self.grid_index[0], self.grid_index[1]
        )
    }
}
