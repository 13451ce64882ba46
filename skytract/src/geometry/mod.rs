//! Spherical geometry for sky regions.
//!
//! Points on the sky are handled as unit vectors ([`glam::DVec3`]) for all
//! membership and overlap tests, which keeps the 0/360 longitude wrap and
//! the poles free of special cases. [`LonLat`] is the degree representation
//! used at the edges: catalog columns, tiling-scheme vertex lists and the
//! partition-pruning interface. [`LonLat::from_vector`] is the single
//! Cartesian to longitude/latitude conversion used throughout the crate.

mod cap;
mod coords;
mod gnomonic;
mod lonlat_box;
mod polygon;
mod region;

pub use cap::Cap;
pub use coords::{angular_separation, normalize_lon, to_lonlat_vertices, LonLat};
pub use gnomonic::TangentPlane;
pub use lonlat_box::LonLatBox;
pub use polygon::ConvexPolygon;
pub use region::SkyRegion;
