use glam::{DVec2, DVec3};

/// Smallest `p . center` accepted by [`TangentPlane::project`].
const MIN_FORWARD: f64 = 1e-9;

/// Gnomonic (tangent-plane) projection about a point on the sphere.
///
/// Plane coordinates are in tangent units (radians near the center), with
/// `x` increasing east and `y` north. Great circles project to straight
/// lines, so a rectangle in the plane deprojects to a convex spherical
/// quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentPlane {
    center: DVec3,
    east: DVec3,
    north: DVec3,
}

impl TangentPlane {
    /// Creates a projection about `center`.
    ///
    /// At the poles, where east is undefined, the plane's `x` axis follows
    /// the meridian of longitude 90.
    pub fn new(center: DVec3) -> Self {
        let center = center.normalize();
        let east = DVec3::Z.cross(center);
        let east = if east.length() < MIN_FORWARD {
            DVec3::Y
        } else {
            east.normalize()
        };
        let north = center.cross(east).normalize();
        Self {
            center,
            east,
            north,
        }
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Projects `p` onto the plane, or `None` if `p` is not in the
    /// hemisphere facing the center.
    pub fn project(&self, p: DVec3) -> Option<DVec2> {
        let forward = p.dot(self.center);
        if forward <= MIN_FORWARD {
            return None;
        }
        Some(DVec2::new(
            p.dot(self.east) / forward,
            p.dot(self.north) / forward,
        ))
    }

    /// Maps a plane point back to a unit vector.
    pub fn deproject(&self, xy: DVec2) -> DVec3 {
        (self.center + self.east * xy.x + self.north * xy.y).normalize()
    }
}
