//! Hierarchical Triangular Mesh (HTM) trixels.
//!
//! The sphere is split into 8 root triangles (ids 8 to 15) by the octahedron
//! on the coordinate axes. Each trixel is divided into 4 children by its edge
//! midpoints, and child `k` of trixel `id` has id `4 * id + k`. A trixel at
//! depth `d` therefore has an id in `[8 * 4^d, 16 * 4^d)`.

use glam::DVec3;
use std::fmt::{self, Display};

use super::metadata::MAX_PARTITION_DEPTH;
use crate::errors::{SkyError, SkyResult};
use crate::geometry::{angular_separation, Cap};

/// Slack added to trixel bounding caps, in radians.
const CAP_EPSILON: f64 = 1e-9;

/// Root trixels in id order: S0..S3 then N0..N3.
const ROOTS: [[DVec3; 3]; 8] = [
    [DVec3::X, DVec3::NEG_Z, DVec3::Y],
    [DVec3::Y, DVec3::NEG_Z, DVec3::NEG_X],
    [DVec3::NEG_X, DVec3::NEG_Z, DVec3::NEG_Y],
    [DVec3::NEG_Y, DVec3::NEG_Z, DVec3::X],
    [DVec3::X, DVec3::Z, DVec3::NEG_Y],
    [DVec3::NEG_Y, DVec3::Z, DVec3::NEG_X],
    [DVec3::NEG_X, DVec3::Z, DVec3::Y],
    [DVec3::Y, DVec3::Z, DVec3::X],
];

/// A spherical triangle of the HTM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trixel {
    id: u64,
    depth: u8,
    vertices: [DVec3; 3],
}

impl Trixel {
    /// The trixel at `depth` holding the unit vector `p`.
    ///
    /// Points on a shared edge go to whichever neighbour holds them with the
    /// largest margin, so every point maps to exactly one trixel.
    pub fn locate(p: DVec3, depth: u8) -> Trixel {
        let p = p.normalize();
        let mut current = (0..ROOTS.len())
            .map(|i| Self::root(i as u64))
            .max_by(|a, b| a.margin(p).total_cmp(&b.margin(p)))
            .unwrap_or_else(|| Self::root(0));

        for _ in 0..depth {
            current = current
                .children()
                .into_iter()
                .max_by(|a, b| a.margin(p).total_cmp(&b.margin(p)))
                .unwrap_or(current);
        }
        current
    }

    /// Rebuilds a trixel from its id.
    ///
    /// # Errors
    /// Returns [`SkyError::InvalidRegion`] if `id` is not a valid HTM id.
    pub fn from_id(id: u64) -> SkyResult<Trixel> {
        if id < 8 {
            return Err(SkyError::InvalidRegion(format!("invalid trixel id {}", id)));
        }
        let bits = 63 - id.leading_zeros() as u8;
        if (bits - 3) % 2 != 0 || (bits - 3) / 2 > MAX_PARTITION_DEPTH {
            return Err(SkyError::InvalidRegion(format!("invalid trixel id {}", id)));
        }
        let depth = (bits - 3) / 2;
        let mut trixel = Self::root((id >> (2 * depth as u32)) - 8);
        for level in (0..depth).rev() {
            let k = ((id >> (2 * level as u32)) & 3) as usize;
            trixel = trixel.children()[k];
        }
        Ok(trixel)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn vertices(&self) -> &[DVec3; 3] {
        &self.vertices
    }

    /// Returns true if `p` is inside or on the boundary of this trixel.
    pub fn contains(&self, p: DVec3) -> bool {
        self.margin(p) >= 0.0
    }

    /// A cap holding the whole trixel.
    pub fn bounding_cap(&self) -> Cap {
        let center = (self.vertices[0] + self.vertices[1] + self.vertices[2]).normalize();
        let radius = self
            .vertices
            .iter()
            .map(|v| angular_separation(center, *v))
            .fold(0.0, f64::max);
        Cap::new(center, radius + CAP_EPSILON)
    }

    /// The four children in id order.
    pub fn children(&self) -> [Trixel; 4] {
        let [v0, v1, v2] = self.vertices;
        let w0 = (v1 + v2).normalize();
        let w1 = (v0 + v2).normalize();
        let w2 = (v0 + v1).normalize();
        let child = |k: u64, vertices: [DVec3; 3]| Trixel {
            id: self.id * 4 + k,
            depth: self.depth + 1,
            vertices,
        };
        [
            child(0, [v0, w2, w1]),
            child(1, [v1, w0, w2]),
            child(2, [v2, w1, w0]),
            child(3, [w0, w1, w2]),
        ]
    }

    fn root(index: u64) -> Trixel {
        Trixel {
            id: 8 + index,
            depth: 0,
            vertices: ROOTS[index as usize],
        }
    }

    /// Smallest signed distance of `p` to the trixel's edge planes.
    fn margin(&self, p: DVec3) -> f64 {
        (0..3)
            .map(|i| {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % 3];
                a.cross(b).normalize().dot(p)
            })
            .fold(f64::INFINITY, f64::min)
    }
}

impl Display for Trixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trixel({}, depth={})", self.id, self.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LonLat;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_points(count: usize) -> Vec<DVec3> {
        let mut rng = StdRng::seed_from_u64(42);
        (0..count)
            .map(|_| {
                let lon = rng.gen_range(0.0..360.0);
                let z: f64 = rng.gen_range(-1.0..1.0);
                LonLat::new(lon, z.asin().to_degrees()).unwrap().to_vector()
            })
            .collect()
    }

    #[test]
    fn test_roots_cover_sphere() {
        for p in random_points(500) {
            let holders = (0..8).filter(|i| Trixel::root(*i).contains(p)).count();
            assert!(holders >= 1);
        }
        for i in 0..8 {
            let root = Trixel::root(i);
            let centroid = root.vertices.iter().copied().sum::<DVec3>().normalize();
            assert!(root.margin(centroid) > 0.0, "root {} is wound clockwise", i);
        }
    }

    #[test]
    fn test_locate_contains_point() {
        for p in random_points(500) {
            let trixel = Trixel::locate(p, 6);
            assert_eq!(trixel.depth(), 6);
            assert!(trixel.margin(p) > -1e-12);
            assert!(trixel.bounding_cap().contains(p));
        }
    }

    #[test]
    fn test_id_ranges() {
        let trixel = Trixel::locate(DVec3::new(0.3, -0.5, 0.8), 3);
        assert!(trixel.id() >= 8 * 64 && trixel.id() < 16 * 64);
    }

    #[test]
    fn test_from_id() {
        for p in random_points(50) {
            let trixel = Trixel::locate(p, 5);
            let rebuilt = Trixel::from_id(trixel.id()).unwrap();
            assert_eq!(rebuilt, trixel);
        }
        assert!(Trixel::from_id(3).is_err());
        // 16..32 has an odd number of bits below the root
        assert!(Trixel::from_id(20).is_err());
    }

    #[test]
    fn test_children_nest() {
        let parent = Trixel::locate(DVec3::new(-0.2, 0.4, -0.7), 2);
        let cap = parent.bounding_cap();
        for child in parent.children() {
            assert_eq!(child.id() / 4, parent.id());
            for v in child.vertices() {
                assert!(cap.contains(*v));
            }
        }
    }

    #[test]
    fn test_locate_poles_and_axes() {
        for p in [DVec3::Z, DVec3::NEG_Z, DVec3::X, DVec3::NEG_Y] {
            let trixel = Trixel::locate(p, 4);
            assert!(trixel.contains(p));
        }
    }
}
