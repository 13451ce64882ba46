//! Error types for region searches.
//!
//! Every fallible operation in this crate returns [`SkyResult`]. Errors raised
//! by collaborators (tiling scheme, partition structure, membership filter)
//! are propagated unchanged to the caller of a search; nothing here retries,
//! since every operation is deterministic.
//!
//! An empty result (no partition or no row inside a region) is never an
//! error. It is represented by an empty [`PartitionStructure`] or
//! [`PointFrame`].
//!
//! [`PartitionStructure`]: crate::catalog::PartitionStructure
//! [`PointFrame`]: crate::catalog::PointFrame

use thiserror::Error;

/// Errors produced by skymap resolution, geometry construction and catalog
/// filtering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkyError {
    /// A tract or patch id outside the range of the tiling scheme.
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// A boundary that is degenerate, self-intersecting or not convex.
    #[error("Malformed polygon: {0}")]
    MalformedPolygon(String),

    /// A longitude/latitude pair that is not a point on the sphere.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// A configuration value that cannot produce valid geometry.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A column named by the catalog metadata is absent from a frame.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Frame columns of unequal length.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
}

impl SkyError {
    /// Returns true if this error was raised while resolving a tract or patch.
    pub fn is_invalid_region(&self) -> bool {
        matches!(self, SkyError::InvalidRegion(_))
    }
}

/// Result type for sky catalog operations
pub type SkyResult<T> = Result<T, SkyError>;
