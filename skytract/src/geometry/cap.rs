use glam::DVec3;
use std::fmt::{self, Display};

use super::coords::{angular_separation, LonLat};

/// A spherical cap: every point within `radius` radians of `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cap {
    center: DVec3,
    radius: f64,
}

impl Cap {
    /// Creates a cap. The center is normalised and the radius clamped to
    /// `[0, PI]`.
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self {
            center: center.normalize(),
            radius: radius.clamp(0.0, std::f64::consts::PI),
        }
    }

    /// Smallest cap around `center` holding every point of `points`.
    pub fn around(center: DVec3, points: &[DVec3]) -> Self {
        let center = center.normalize();
        let radius = points
            .iter()
            .map(|p| angular_separation(center, *p))
            .fold(0.0, f64::max);
        Self::new(center, radius)
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Angular radius in radians.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn contains(&self, p: DVec3) -> bool {
        angular_separation(self.center, p) <= self.radius
    }

    pub fn intersects(&self, other: &Cap) -> bool {
        angular_separation(self.center, other.center) <= self.radius + other.radius
    }

    /// Returns a cap with the radius grown by `angle` radians.
    pub fn dilated(&self, angle: f64) -> Self {
        Self::new(self.center, self.radius + angle)
    }
}

impl Display for Cap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CAP({}, {:.6})",
            LonLat::from_vector(self.center),
            self.radius.to_degrees()
        )
    }
}
