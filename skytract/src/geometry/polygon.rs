//! Convex spherical polygons bounded by great-circle edges.
//!
//! Tract and patch boundaries produced by gnomonic tiling are convex
//! quadrilaterals, and the partition-pruning step accepts any convex loop of
//! longitude/latitude vertices. Vertices are stored counter-clockwise as seen
//! from outside the sphere, so the interior lies on the positive side of
//! every edge plane `v[i] x v[i + 1]`.

use glam::DVec3;
use std::f64::consts::FRAC_PI_2;
use std::fmt::{self, Display};

use super::cap::Cap;
use super::coords::{angular_separation, to_lonlat_vertices, LonLat};
use crate::errors::{SkyError, SkyResult};

/// Minimum separation in radians between consecutive vertices.
const MIN_EDGE_LENGTH: f64 = 1e-12;

/// Tolerance for vertices lying on a neighbouring edge plane.
const CONVEXITY_TOLERANCE: f64 = 1e-14;

/// A convex polygon on the unit sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolygon {
    vertices: Vec<DVec3>,
    edge_normals: Vec<DVec3>,
    centroid: DVec3,
}

impl ConvexPolygon {
    /// Creates a polygon from Cartesian vertices.
    ///
    /// Vertices are normalised. A clockwise loop is reversed.
    ///
    /// # Errors
    /// Returns [`SkyError::MalformedPolygon`] if there are fewer than three
    /// vertices, a vertex is not finite or zero, consecutive vertices
    /// coincide, the loop is not convex (including self-intersecting
    /// orderings), or it does not fit inside a hemisphere.
    pub fn new(vertices: Vec<DVec3>) -> SkyResult<Self> {
        if vertices.len() < 3 {
            return Err(malformed(format!(
                "a polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }

        let mut unit = Vec::with_capacity(vertices.len());
        for v in vertices {
            if !v.is_finite() || v.length_squared() == 0.0 {
                return Err(malformed(format!("invalid vertex {:?}", v)));
            }
            unit.push(v.normalize());
        }

        let n = unit.len();
        for i in 0..n {
            let a = unit[i];
            let b = unit[(i + 1) % n];
            if angular_separation(a, b) < MIN_EDGE_LENGTH {
                return Err(malformed(format!(
                    "vertices {} and {} coincide",
                    i,
                    (i + 1) % n
                )));
            }
        }

        let centroid = unit.iter().copied().sum::<DVec3>();
        if centroid.length() < MIN_EDGE_LENGTH {
            return Err(malformed("vertices do not fit in a hemisphere".to_string()));
        }
        let centroid = centroid.normalize();

        let winding: f64 = (0..n)
            .map(|i| unit[i].cross(unit[(i + 1) % n]).dot(centroid))
            .sum();
        if winding < 0.0 {
            unit.reverse();
        }

        let edge_normals: Vec<DVec3> = (0..n)
            .map(|i| unit[i].cross(unit[(i + 1) % n]).normalize())
            .collect();

        for (i, normal) in edge_normals.iter().enumerate() {
            if normal.dot(centroid) <= 0.0 {
                return Err(malformed(format!(
                    "edge {} does not face the polygon interior",
                    i
                )));
            }
            for (k, v) in unit.iter().enumerate() {
                if k == i || k == (i + 1) % n {
                    continue;
                }
                if normal.dot(*v) < -CONVEXITY_TOLERANCE {
                    return Err(malformed(format!(
                        "vertex {} lies outside edge {}; loop is not convex",
                        k, i
                    )));
                }
            }
        }

        Ok(Self {
            vertices: unit,
            edge_normals,
            centroid,
        })
    }

    /// Creates a polygon from longitude/latitude vertices.
    pub fn from_lonlat(vertices: &[LonLat]) -> SkyResult<Self> {
        Self::new(vertices.iter().map(LonLat::to_vector).collect())
    }

    /// Vertices as unit vectors, counter-clockwise.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Vertices converted to longitude/latitude.
    pub fn lonlat_vertices(&self) -> Vec<LonLat> {
        to_lonlat_vertices(&self.vertices)
    }

    pub fn centroid(&self) -> DVec3 {
        self.centroid
    }

    /// Returns true if `p` lies strictly inside every edge.
    pub fn contains(&self, p: DVec3) -> bool {
        self.edge_normals.iter().all(|n| n.dot(p) > 0.0)
    }

    /// Smallest cap around the vertex centroid holding every vertex.
    pub fn bounding_cap(&self) -> Cap {
        Cap::around(self.centroid, &self.vertices)
    }

    /// Exact overlap test between this polygon and a cap.
    ///
    /// The two overlap iff the cap center is inside the polygon, or some
    /// edge arc comes within the cap radius of the center.
    pub fn intersects_cap(&self, cap: &Cap) -> bool {
        if self.contains(cap.center()) {
            return true;
        }
        let n = self.vertices.len();
        (0..n).any(|i| {
            arc_distance(cap.center(), self.vertices[i], self.vertices[(i + 1) % n])
                <= cap.radius()
        })
    }
}

impl Display for ConvexPolygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POLYGON((")?;
        for (i, v) in self.lonlat_vertices().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", v.lon(), v.lat())?;
        }
        write!(f, "))")
    }
}

fn malformed(message: String) -> SkyError {
    log::error!("Malformed polygon: {}", message);
    SkyError::MalformedPolygon(message)
}

/// Angular distance in radians from `p` to the minor great-circle arc `a..b`.
pub(crate) fn arc_distance(p: DVec3, a: DVec3, b: DVec3) -> f64 {
    let normal = a.cross(b);
    if normal.length() < MIN_EDGE_LENGTH {
        return angular_separation(p, a);
    }
    let normal = normal.normalize();

    let in_plane = p - normal * p.dot(normal);
    if in_plane.length() < MIN_EDGE_LENGTH {
        // p is a pole of the arc's great circle
        return FRAC_PI_2;
    }
    let q = in_plane.normalize();
    if a.cross(q).dot(normal) >= 0.0 && q.cross(b).dot(normal) >= 0.0 {
        angular_separation(p, q)
    } else {
        angular_separation(p, a).min(angular_separation(p, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ll(lon: f64, lat: f64) -> LonLat {
        LonLat::new(lon, lat).unwrap()
    }

    fn square(lon: f64, lat: f64, half: f64) -> ConvexPolygon {
        ConvexPolygon::from_lonlat(&[
            ll(lon - half, lat - half),
            ll(lon + half, lat - half),
            ll(lon + half, lat + half),
            ll(lon - half, lat + half),
        ])
        .unwrap()
    }

    #[test]
    fn test_contains() {
        let poly = square(10.0, 10.0, 1.0);
        assert!(poly.contains(ll(10.0, 10.0).to_vector()));
        assert!(poly.contains(ll(10.9, 9.1).to_vector()));
        assert!(!poly.contains(ll(12.0, 10.0).to_vector()));
        assert!(!poly.contains(ll(190.0, -10.0).to_vector()));
    }

    #[test]
    fn test_clockwise_input_is_reoriented() {
        let cw = ConvexPolygon::from_lonlat(&[
            ll(9.0, 11.0),
            ll(11.0, 11.0),
            ll(11.0, 9.0),
            ll(9.0, 9.0),
        ])
        .unwrap();
        assert!(cw.contains(ll(10.0, 10.0).to_vector()));
    }

    #[test]
    fn test_across_antimeridian() {
        let poly = square(0.0, 0.0, 2.0);
        assert!(poly.contains(ll(359.0, 1.0).to_vector()));
        assert!(poly.contains(ll(1.0, -1.0).to_vector()));
        assert!(!poly.contains(ll(357.0, 0.0).to_vector()));
    }

    #[test]
    fn test_around_pole() {
        let poly = ConvexPolygon::from_lonlat(&[
            ll(0.0, 85.0),
            ll(90.0, 85.0),
            ll(180.0, 85.0),
            ll(270.0, 85.0),
        ])
        .unwrap();
        assert!(poly.contains(DVec3::Z));
        assert!(poly.contains(ll(45.0, 88.0).to_vector()));
        assert!(!poly.contains(ll(45.0, 80.0).to_vector()));
    }

    #[test]
    fn test_too_few_vertices() {
        let result = ConvexPolygon::from_lonlat(&[ll(0.0, 0.0), ll(1.0, 0.0)]);
        assert!(matches!(result, Err(SkyError::MalformedPolygon(_))));
    }

    #[test]
    fn test_coincident_vertices() {
        let result =
            ConvexPolygon::from_lonlat(&[ll(0.0, 0.0), ll(0.0, 0.0), ll(1.0, 1.0)]);
        assert!(matches!(result, Err(SkyError::MalformedPolygon(_))));
    }

    #[test]
    fn test_self_intersecting_bowtie() {
        let result = ConvexPolygon::from_lonlat(&[
            ll(0.0, 0.0),
            ll(2.0, 2.0),
            ll(2.0, 0.0),
            ll(0.0, 2.0),
        ]);
        assert!(matches!(result, Err(SkyError::MalformedPolygon(_))));
    }

    #[test]
    fn test_non_convex() {
        let result = ConvexPolygon::from_lonlat(&[
            ll(0.0, 0.0),
            ll(4.0, 0.0),
            ll(4.0, 4.0),
            ll(2.0, 1.0),
            ll(0.0, 4.0),
        ]);
        assert!(matches!(result, Err(SkyError::MalformedPolygon(_))));
    }

    #[test]
    fn test_lonlat_vertices_round_trip() {
        let poly = square(359.5, -30.0, 1.0);
        let again = ConvexPolygon::from_lonlat(&poly.lonlat_vertices()).unwrap();
        for (a, b) in poly.vertices().iter().zip(again.vertices()) {
            assert!((*a - *b).length() < 1e-12);
        }
    }

    #[test]
    fn test_intersects_cap() {
        let poly = square(10.0, 10.0, 1.0);
        // Center inside
        assert!(poly.intersects_cap(&Cap::new(ll(10.0, 10.0).to_vector(), 1e-6)));
        // Edge crossing
        assert!(poly.intersects_cap(&Cap::new(
            ll(11.5, 10.0).to_vector(),
            1f64.to_radians()
        )));
        // Cap enclosing the polygon
        assert!(poly.intersects_cap(&Cap::new(ll(30.0, 10.0).to_vector(), 0.6)));
        // Disjoint
        assert!(!poly.intersects_cap(&Cap::new(
            ll(14.0, 10.0).to_vector(),
            1f64.to_radians()
        )));
    }

    #[test]
    fn test_bounding_cap_holds_polygon() {
        let poly = square(200.0, -45.0, 3.0);
        let cap = poly.bounding_cap();
        for v in poly.vertices() {
            assert!(angular_separation(cap.center(), *v) <= cap.radius() + 1e-12);
        }
        assert!(cap.contains(ll(200.0, -45.0).to_vector()));
    }

    #[test]
    fn test_arc_distance() {
        let a = ll(0.0, 0.0).to_vector();
        let b = ll(10.0, 0.0).to_vector();
        let d = arc_distance(ll(5.0, 3.0).to_vector(), a, b);
        assert!((d.to_degrees() - 3.0).abs() < 1e-9);
        let d = arc_distance(ll(13.0, 0.0).to_vector(), a, b);
        assert!((d.to_degrees() - 3.0).abs() < 1e-9);
        let d = arc_distance(DVec3::Z, a, b);
        assert!((d - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        let poly = square(10.0, 0.0, 1.0);
        assert!(poly.to_string().starts_with("POLYGON(("));
    }
}
