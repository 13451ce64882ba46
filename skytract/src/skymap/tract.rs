//! Tract geometry.
//!
//! A tract is laid out on a gnomonic plane about its center. Its inner region
//! (a longitude/latitude box assigned by the tiling scheme) is bounded in
//! that plane, grown by the tract overlap, snapped outward to whole pixels and
//! then enlarged symmetrically to a whole number of patches per axis. That
//! pixel rectangle deprojects to the tract's outer polygon, and its corners
//! are the tract's raw vertex list. Patches are cells of the same rectangle.

use glam::{DVec2, DVec3};
use std::fmt::{self, Display};

use super::config::RingsSkyMapConfig;
use super::patch::PatchInfo;
use crate::errors::{SkyError, SkyResult};
use crate::geometry::{ConvexPolygon, LonLat, LonLatBox, SkyRegion, TangentPlane};

/// Points sampled along each edge of the inner box when bounding it.
const BOUNDARY_SAMPLES: usize = 65;

/// Geometry of one tract of a tiling scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct TractInfo {
    id: u32,
    center: LonLat,
    inner_sky_region: SkyRegion,
    outer_sky_polygon: ConvexPolygon,
    vertex_list: Vec<LonLat>,
    grid: PatchGrid,
}

/// Pixel layout of a tract on its tangent plane.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PatchGrid {
    plane: TangentPlane,
    pixel_size: f64,
    origin: [i64; 2],
    num_patches: [u32; 2],
    patch_inner: [u32; 2],
    patch_border: u32,
}

impl TractInfo {
    /// Builds a tract from its inner box and center.
    ///
    /// # Errors
    /// Returns [`SkyError::InvalidConfig`] if the inner box is too large for
    /// a gnomonic projection about its center, and propagates
    /// [`SkyError::MalformedPolygon`] from the outer polygon.
    pub fn build(
        id: u32,
        center: LonLat,
        inner_box: LonLatBox,
        config: &RingsSkyMapConfig,
    ) -> SkyResult<Self> {
        let plane = TangentPlane::new(center.to_vector());
        let pixel_size = config.pixel_size();

        let mut min = DVec2::splat(f64::MAX);
        let mut max = DVec2::splat(f64::MIN);
        for p in inner_box.sample_boundary(BOUNDARY_SAMPLES) {
            let xy = plane.project(p).ok_or_else(|| {
                log::error!("Tract {} inner region does not fit its tangent plane", id);
                SkyError::InvalidConfig(format!(
                    "tract {} is too large for a gnomonic projection",
                    id
                ))
            })?;
            min = min.min(xy);
            max = max.max(xy);
        }
        let overlap = config.tract_overlap.to_radians().tan();
        min -= DVec2::splat(overlap);
        max += DVec2::splat(overlap);

        let mut origin = [0i64; 2];
        let mut num_patches = [0u32; 2];
        for axis in 0..2 {
            let lo = (min[axis] / pixel_size).floor() as i64;
            let hi = (max[axis] / pixel_size).ceil() as i64;
            let inner = config.patch_inner_dimensions[axis] as i64;
            let span = (hi - lo).max(1);
            let count = (span + inner - 1) / inner;
            let extra = count * inner - span;
            origin[axis] = lo - extra / 2;
            num_patches[axis] = count as u32;
        }

        let grid = PatchGrid {
            plane,
            pixel_size,
            origin,
            num_patches,
            patch_inner: config.patch_inner_dimensions,
            patch_border: config.patch_border,
        };
        let size = [
            num_patches[0] as i64 * config.patch_inner_dimensions[0] as i64,
            num_patches[1] as i64 * config.patch_inner_dimensions[1] as i64,
        ];
        let outer_sky_polygon = grid.polygon(origin, size, 0)?;
        let vertex_list = outer_sky_polygon.lonlat_vertices();

        log::debug!(
            "Built tract {} at {} with {}x{} patches",
            id,
            center,
            num_patches[0],
            num_patches[1]
        );

        Ok(Self {
            id,
            center,
            inner_sky_region: SkyRegion::Box(inner_box),
            outer_sky_polygon,
            vertex_list,
            grid,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn center(&self) -> LonLat {
        self.center
    }

    /// Raw boundary vertices as longitude/latitude pairs.
    pub fn vertex_list(&self) -> &[LonLat] {
        &self.vertex_list
    }

    /// The exact, non-overlapping region of this tract.
    pub fn inner_sky_region(&self) -> &SkyRegion {
        &self.inner_sky_region
    }

    /// The tract's full pixel footprint, overlapping its neighbours.
    pub fn outer_sky_polygon(&self) -> &ConvexPolygon {
        &self.outer_sky_polygon
    }

    /// Number of patches as `[nx, ny]`.
    pub fn num_patches(&self) -> [u32; 2] {
        self.grid.num_patches
    }

    pub fn patch_count(&self) -> u32 {
        self.grid.num_patches[0] * self.grid.num_patches[1]
    }

    /// Resolves a patch by sequential index.
    ///
    /// # Errors
    /// Returns [`SkyError::InvalidRegion`] if `patch_id` is outside the grid.
    pub fn patch(&self, patch_id: u32) -> SkyResult<PatchInfo> {
        if patch_id >= self.patch_count() {
            log::error!(
                "Patch {} out of range for tract {} with {} patches",
                patch_id,
                self.id,
                self.patch_count()
            );
            return Err(SkyError::InvalidRegion(format!(
                "patch {} out of range [0, {}) for tract {}",
                patch_id,
                self.patch_count(),
                self.id
            )));
        }
        let nx = self.grid.num_patches[0];
        let grid_index = [patch_id % nx, patch_id / nx];
        let inner = self.grid.patch_inner;
        let corner = [
            self.grid.origin[0] + grid_index[0] as i64 * inner[0] as i64,
            self.grid.origin[1] + grid_index[1] as i64 * inner[1] as i64,
        ];
        let size = [inner[0] as i64, inner[1] as i64];
        let inner_polygon = self.grid.polygon(corner, size, 0)?;
        let outer_polygon = self
            .grid
            .polygon(corner, size, self.grid.patch_border as i64)?;
        Ok(PatchInfo::new(patch_id, grid_index, inner_polygon, outer_polygon))
    }

    /// Sequential index of the patch whose inner area holds `coord`, if any.
    pub fn find_patch(&self, coord: &LonLat) -> Option<u32> {
        let xy = self.grid.plane.project(coord.to_vector())?;
        let mut index = [0u32; 2];
        for axis in 0..2 {
            let px = xy[axis] / self.grid.pixel_size - self.grid.origin[axis] as f64;
            let cell = (px / self.grid.patch_inner[axis] as f64).floor();
            if cell < 0.0 || cell >= self.grid.num_patches[axis] as f64 {
                return None;
            }
            index[axis] = cell as u32;
        }
        Some(index[1] * self.grid.num_patches[0] + index[0])
    }

    /// All patches in sequential order.
    pub fn patches(&self) -> SkyResult<Vec<PatchInfo>> {
        (0..self.patch_count()).map(|i| self.patch(i)).collect()
    }
}

impl Display for TractInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tract({}, center={})", self.id, self.center)
    }
}

impl PatchGrid {
    /// Deprojects a pixel rectangle grown by `border` pixels on every side.
    fn polygon(&self, corner: [i64; 2], size: [i64; 2], border: i64) -> SkyResult<ConvexPolygon> {
        let x0 = (corner[0] - border) as f64 * self.pixel_size;
        let y0 = (corner[1] - border) as f64 * self.pixel_size;
        let x1 = (corner[0] + size[0] + border) as f64 * self.pixel_size;
        let y1 = (corner[1] + size[1] + border) as f64 * self.pixel_size;
        let vertices: Vec<DVec3> = [
            DVec2::new(x0, y0),
            DVec2::new(x1, y0),
            DVec2::new(x1, y1),
            DVec2::new(x0, y1),
        ]
        .into_iter()
        .map(|xy| self.plane.deproject(xy))
        .collect();
        ConvexPolygon::new(vertices)
    }
}
