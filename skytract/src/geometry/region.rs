use glam::DVec3;
use std::fmt::{self, Display};

use super::cap::Cap;
use super::coords::LonLat;
use super::lonlat_box::LonLatBox;
use super::polygon::ConvexPolygon;

/// A bounded area of the sky usable for exact point membership.
///
/// Tract inner regions are longitude/latitude boxes, every other tract and
/// patch boundary is a convex polygon.
#[derive(Debug, Clone, PartialEq)]
pub enum SkyRegion {
    Polygon(ConvexPolygon),
    Box(LonLatBox),
}

impl SkyRegion {
    pub fn contains(&self, p: DVec3) -> bool {
        match self {
            SkyRegion::Polygon(polygon) => polygon.contains(p),
            SkyRegion::Box(lonlat_box) => lonlat_box.contains(p),
        }
    }

    pub fn contains_lonlat(&self, coord: &LonLat) -> bool {
        match self {
            SkyRegion::Polygon(polygon) => polygon.contains(coord.to_vector()),
            SkyRegion::Box(lonlat_box) => lonlat_box.contains_lonlat(coord),
        }
    }

    /// Exact overlap test against a cap.
    pub fn intersects_cap(&self, cap: &Cap) -> bool {
        match self {
            SkyRegion::Polygon(polygon) => polygon.intersects_cap(cap),
            SkyRegion::Box(lonlat_box) => lonlat_box.intersects_cap(cap),
        }
    }

    /// Returns the polygon if this region is one.
    pub fn as_polygon(&self) -> Option<&ConvexPolygon> {
        match self {
            SkyRegion::Polygon(polygon) => Some(polygon),
            SkyRegion::Box(_) => None,
        }
    }
}

impl From<ConvexPolygon> for SkyRegion {
    fn from(polygon: ConvexPolygon) -> Self {
        SkyRegion::Polygon(polygon)
    }
}

impl From<LonLatBox> for SkyRegion {
    fn from(lonlat_box: LonLatBox) -> Self {
        SkyRegion::Box(lonlat_box)
    }
}

impl Display for SkyRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkyRegion::Polygon(polygon) => write!(f, "{}", polygon),
            SkyRegion::Box(lonlat_box) => write!(f, "{}", lonlat_box),
        }
    }
}
