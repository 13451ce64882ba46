use std::any::Any;
use std::fmt::{self, Display};

use super::provider::SearchProvider;
use crate::catalog::{CatalogMetadata, PartitionStructure, PointFrame};
use crate::errors::SkyResult;
use crate::geometry::{ConvexPolygon, LonLat, SkyRegion};

/// Keeps the rows of `frame` whose position lies strictly inside `region`.
///
/// Positions are read from the metadata's RA/Dec columns. Rows without a
/// valid position never match.
///
/// # Errors
/// Returns [`SkyError::MissingColumn`](crate::SkyError::MissingColumn) if a
/// position column is absent.
pub fn polygon_filter(
    frame: &PointFrame,
    region: &SkyRegion,
    metadata: &CatalogMetadata,
) -> SkyResult<PointFrame> {
    let rows: Vec<usize> = frame
        .positions(metadata)?
        .iter()
        .enumerate()
        .filter_map(|(row, position)| match position {
            Some(coord) if region.contains(coord.to_vector()) => Some(row),
            _ => None,
        })
        .collect();
    Ok(frame.take(&rows))
}

/// A search inside a free-form region.
#[derive(Debug, Clone)]
pub struct PolygonSearch {
    region: SkyRegion,
    fine: bool,
}

impl PolygonSearch {
    /// Searches inside a convex lon/lat polygon.
    ///
    /// # Errors
    /// Returns [`SkyError::MalformedPolygon`](crate::SkyError::MalformedPolygon)
    /// if the vertices do not form a convex polygon.
    pub fn new(vertices: Vec<LonLat>, fine: bool) -> SkyResult<Self> {
        let polygon = ConvexPolygon::from_lonlat(&vertices)?;
        Ok(Self::from_region(SkyRegion::Polygon(polygon), fine))
    }

    pub fn from_region(region: SkyRegion, fine: bool) -> Self {
        Self { region, fine }
    }

    pub fn region(&self) -> &SkyRegion {
        &self.region
    }
}

impl SearchProvider for PolygonSearch {
    fn fine(&self) -> bool {
        self.fine
    }

    fn filter_partitions(&self, structure: &PartitionStructure) -> SkyResult<PartitionStructure> {
        Ok(structure.filter_by_region(&self.region))
    }

    fn search_points(
        &self,
        frame: &PointFrame,
        metadata: &CatalogMetadata,
    ) -> SkyResult<PointFrame> {
        polygon_filter(frame, &self.region, metadata)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Display for PolygonSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PolygonSearch({}, fine={})", self.region, self.fine)
    }
}
