use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::errors::{SkyError, SkyResult};

/// A position on the celestial sphere as longitude/latitude in degrees.
///
/// For equatorial coordinates the longitude is right ascension and the
/// latitude is declination. Longitudes are always kept in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    lon: f64,
    lat: f64,
}

impl LonLat {
    /// Creates a validated coordinate.
    ///
    /// The longitude is wrapped into `[0, 360)`.
    ///
    /// # Errors
    /// Returns [`SkyError::InvalidCoordinate`] if either value is not finite
    /// or the latitude lies outside `[-90, 90]`.
    pub fn new(lon: f64, lat: f64) -> SkyResult<Self> {
        if !lon.is_finite() || !lat.is_finite() {
            log::error!("Non-finite coordinate ({}, {})", lon, lat);
            return Err(SkyError::InvalidCoordinate(format!(
                "coordinates must be finite, got ({}, {})",
                lon, lat
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            log::error!("Latitude {} out of range", lat);
            return Err(SkyError::InvalidCoordinate(format!(
                "latitude must be between -90 and 90 degrees, got: {}",
                lat
            )));
        }
        Ok(Self {
            lon: normalize_lon(lon),
            lat,
        })
    }

    /// Converts a Cartesian vector to longitude/latitude.
    ///
    /// The vector is normalised first. Longitude is `atan2(y, x)` mapped into
    /// `[0, 360)`, latitude is `asin(z)`. At the poles the longitude is 0.
    pub fn from_vector(v: DVec3) -> Self {
        let v = v.normalize_or_zero();
        let lon = if v.x == 0.0 && v.y == 0.0 {
            0.0
        } else {
            normalize_lon(v.y.atan2(v.x).to_degrees())
        };
        let lat = v.z.clamp(-1.0, 1.0).asin().to_degrees();
        Self { lon, lat }
    }

    /// Converts to a unit vector on the sphere.
    pub fn to_vector(&self) -> DVec3 {
        let (sin_lon, cos_lon) = self.lon.to_radians().sin_cos();
        let (sin_lat, cos_lat) = self.lat.to_radians().sin_cos();
        DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }

    /// Longitude in degrees, within `[0, 360)`.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Latitude in degrees, within `[-90, 90]`.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Returns the `(lon, lat)` tuple in degrees.
    pub fn as_degrees(&self) -> (f64, f64) {
        (self.lon, self.lat)
    }

    /// Angular distance to another coordinate in degrees.
    pub fn separation(&self, other: &LonLat) -> f64 {
        angular_separation(self.to_vector(), other.to_vector()).to_degrees()
    }
}

impl Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

impl From<DVec3> for LonLat {
    fn from(v: DVec3) -> Self {
        LonLat::from_vector(v)
    }
}

/// Wraps a longitude in degrees into `[0, 360)`.
pub fn normalize_lon(lon: f64) -> f64 {
    let wrapped = lon.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Angle in radians between two vectors, stable for small and near-antipodal
/// separations.
pub fn angular_separation(a: DVec3, b: DVec3) -> f64 {
    a.cross(b).length().atan2(a.dot(b))
}

/// Converts a list of Cartesian vertices to longitude/latitude.
pub fn to_lonlat_vertices(vertices: &[DVec3]) -> Vec<LonLat> {
    vertices.iter().copied().map(LonLat::from_vector).collect()
}
