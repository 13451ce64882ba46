use glam::DVec3;
use std::fmt::{self, Display};

use super::cap::Cap;
use super::coords::{angular_separation, normalize_lon, LonLat};
use super::polygon::arc_distance;
use crate::errors::{SkyError, SkyResult};

/// A longitude/latitude box.
///
/// Longitudes span the half-open interval `[lon_min, lon_min + width)` and may
/// wrap across 0/360. Latitudes span `[lat_min, lat_max)`, with `lat_max = 90`
/// inclusive so the north pole belongs to the box that reaches it. The
/// half-open convention lets a set of boxes tile the sphere without overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLatBox {
    lon_min: f64,
    width: f64,
    lat_min: f64,
    lat_max: f64,
}

impl LonLatBox {
    /// Creates a box from `lon_min` eastward to `lon_max`.
    ///
    /// When `lon_max < lon_min` the box wraps across longitude 0.
    ///
    /// # Errors
    /// Returns [`SkyError::InvalidCoordinate`] if a bound is not finite or the
    /// latitude range is empty or outside `[-90, 90]`.
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> SkyResult<Self> {
        if !lon_min.is_finite() || !lon_max.is_finite() {
            return Err(SkyError::InvalidCoordinate(format!(
                "box longitudes must be finite, got [{}, {})",
                lon_min, lon_max
            )));
        }
        let (lo, hi) = (normalize_lon(lon_min), normalize_lon(lon_max));
        let width = if hi > lo { hi - lo } else { hi - lo + 360.0 };
        Self::with_width(lo, width, lat_min, lat_max)
    }

    /// Creates a box covering every longitude between two latitudes.
    pub fn full_lon(lat_min: f64, lat_max: f64) -> SkyResult<Self> {
        Self::with_width(0.0, 360.0, lat_min, lat_max)
    }

    fn with_width(lon_min: f64, width: f64, lat_min: f64, lat_max: f64) -> SkyResult<Self> {
        if !(-90.0..=90.0).contains(&lat_min)
            || !(-90.0..=90.0).contains(&lat_max)
            || lat_min >= lat_max
        {
            log::error!("Invalid box latitude range [{}, {})", lat_min, lat_max);
            return Err(SkyError::InvalidCoordinate(format!(
                "invalid box latitude range [{}, {})",
                lat_min, lat_max
            )));
        }
        Ok(Self {
            lon_min,
            width: width.clamp(0.0, 360.0),
            lat_min,
            lat_max,
        })
    }

    pub fn lon_min(&self) -> f64 {
        self.lon_min
    }

    pub fn lon_max(&self) -> f64 {
        normalize_lon(self.lon_min + self.width)
    }

    /// Longitude extent in degrees.
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn lat_min(&self) -> f64 {
        self.lat_min
    }

    pub fn lat_max(&self) -> f64 {
        self.lat_max
    }

    pub fn is_full_lon(&self) -> bool {
        self.width >= 360.0
    }

    /// Center of the box in longitude and latitude.
    pub fn center(&self) -> LonLat {
        let lon = if self.is_full_lon() {
            0.0
        } else {
            normalize_lon(self.lon_min + self.width / 2.0)
        };
        let lat = if self.lat_min <= -90.0 && self.is_full_lon() {
            -90.0
        } else if self.lat_max >= 90.0 && self.is_full_lon() {
            90.0
        } else {
            (self.lat_min + self.lat_max) / 2.0
        };
        LonLat::from_vector(lonlat_vector(lon, lat))
    }

    pub fn contains_lonlat(&self, coord: &LonLat) -> bool {
        let lat = coord.lat();
        let lat_ok = lat >= self.lat_min && (lat < self.lat_max || self.lat_max >= 90.0);
        lat_ok && self.contains_lon(coord.lon())
    }

    pub fn contains(&self, p: DVec3) -> bool {
        self.contains_lonlat(&LonLat::from_vector(p))
    }

    fn contains_lon(&self, lon: f64) -> bool {
        self.is_full_lon() || normalize_lon(lon - self.lon_min) < self.width
    }

    /// Exact overlap test between this box and a cap.
    ///
    /// Meridian edges are great-circle arcs. Along a parallel the distance to
    /// a fixed point grows with the longitude difference, so the nearest point
    /// of a parallel edge is either at the point's own longitude or at one of
    /// the edge's ends.
    pub fn intersects_cap(&self, cap: &Cap) -> bool {
        if self.contains(cap.center()) {
            return true;
        }
        let center = LonLat::from_vector(cap.center());
        for lat in [self.lat_min, self.lat_max] {
            if self.parallel_distance(&center, lat) <= cap.radius() {
                return true;
            }
        }
        if self.is_full_lon() {
            return false;
        }
        let east = self.lon_min + self.width;
        [self.lon_min, east].iter().any(|lon| {
            let a = lonlat_vector(*lon, self.lat_min);
            let b = lonlat_vector(*lon, self.lat_max);
            arc_distance(cap.center(), a, b) <= cap.radius()
        })
    }

    /// Radians from `p` to the parallel at `lat` restricted to this box.
    fn parallel_distance(&self, p: &LonLat, lat: f64) -> f64 {
        let target = if self.contains_lon(p.lon()) {
            p.lon()
        } else {
            let west = normalize_lon(self.lon_min - p.lon());
            let east = normalize_lon(p.lon() - (self.lon_min + self.width));
            if west.min(360.0 - west) <= east.min(360.0 - east) {
                self.lon_min
            } else {
                self.lon_min + self.width
            }
        };
        angular_separation(p.to_vector(), lonlat_vector(target, lat))
    }

    /// Samples `per_edge` points along each of the four edges.
    pub fn sample_boundary(&self, per_edge: usize) -> Vec<DVec3> {
        let steps = per_edge.max(2);
        let mut points = Vec::with_capacity(steps * 4);
        for i in 0..steps {
            let t = i as f64 / (steps - 1) as f64;
            let lon = self.lon_min + t * self.width;
            let lat = self.lat_min + t * (self.lat_max - self.lat_min);
            points.push(lonlat_vector(lon, self.lat_min));
            points.push(lonlat_vector(lon, self.lat_max));
            points.push(lonlat_vector(self.lon_min, lat));
            points.push(lonlat_vector(self.lon_min + self.width, lat));
        }
        points
    }
}

impl Display for LonLatBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BOX(lon=[{}, {}), lat=[{}, {}))",
            self.lon_min,
            self.lon_min + self.width,
            self.lat_min,
            self.lat_max
        )
    }
}

/// Unit vector for longitude/latitude degrees without validation.
fn lonlat_vector(lon: f64, lat: f64) -> DVec3 {
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}
