use std::fmt::{self, Display};

use super::htm::Trixel;
use crate::errors::SkyResult;
use crate::geometry::{ConvexPolygon, LonLat, SkyRegion};

/// One partition of a catalog: the rows falling in a single trixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionInfo {
    pub trixel: Trixel,
    pub num_rows: usize,
}

/// The partition layout of a catalog, ordered by trixel id.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionStructure {
    catalog_name: String,
    depth: u8,
    partitions: Vec<PartitionInfo>,
}

impl PartitionStructure {
    pub fn new(catalog_name: impl Into<String>, depth: u8, mut partitions: Vec<PartitionInfo>) -> Self {
        partitions.sort_by_key(|p| p.trixel.id());
        Self {
            catalog_name: catalog_name.into(),
            depth,
            partitions,
        }
    }

    pub fn catalog_name(&self) -> &str {
        &self.catalog_name
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn partitions(&self) -> &[PartitionInfo] {
        &self.partitions
    }

    pub fn partition_ids(&self) -> Vec<u64> {
        self.partitions.iter().map(|p| p.trixel.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Total rows over all partitions.
    pub fn total_rows(&self) -> usize {
        self.partitions.iter().map(|p| p.num_rows).sum()
    }

    /// Keeps the partitions that may overlap a lon/lat polygon.
    ///
    /// A partition is dropped only if its trixel is provably disjoint from
    /// the polygon, so no matching row is ever lost.
    ///
    /// # Errors
    /// Returns [`SkyError::MalformedPolygon`](crate::SkyError::MalformedPolygon)
    /// if the vertices do not form a convex polygon.
    pub fn filter_by_polygon(&self, vertices: &[LonLat]) -> SkyResult<PartitionStructure> {
        let polygon = ConvexPolygon::from_lonlat(vertices)?;
        Ok(self.filter_by_region(&SkyRegion::Polygon(polygon)))
    }

    /// Keeps the partitions that may overlap `region`.
    pub fn filter_by_region(&self, region: &SkyRegion) -> PartitionStructure {
        let partitions: Vec<PartitionInfo> = self
            .partitions
            .iter()
            .filter(|p| region.intersects_cap(&p.trixel.bounding_cap()))
            .copied()
            .collect();
        log::debug!(
            "Pruned {} partitions of {} to {} against {}",
            self.partitions.len(),
            self.catalog_name,
            partitions.len(),
            region
        );
        Self {
            catalog_name: self.catalog_name.clone(),
            depth: self.depth,
            partitions,
        }
    }
}

impl Display for PartitionStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PartitionStructure({}, depth={}, partitions={})",
            self.catalog_name,
            self.depth,
            self.partitions.len()
        )
    }
}
