use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::sync::Arc;

use super::frame::PointFrame;
use super::htm::Trixel;
use super::metadata::CatalogMetadata;
use super::partition::{PartitionInfo, PartitionStructure};
use crate::errors::{SkyError, SkyResult};
use crate::search::{Search, SearchProvider};

/// An in-memory catalog partitioned by HTM trixel.
///
/// Searches are lazy. [`Catalog::search`] prunes the partition structure
/// right away and queues the point-level phase; [`Catalog::compute`] runs the
/// queued phases over the surviving partitions in parallel. Cloning a catalog
/// shares its partition data.
#[derive(Clone)]
pub struct Catalog {
    metadata: Arc<CatalogMetadata>,
    structure: PartitionStructure,
    partitions: Arc<BTreeMap<u64, PointFrame>>,
    template: PointFrame,
    pending: Vec<Search>,
}

impl Catalog {
    /// Partitions the rows of `frame` at the metadata's HTM depth.
    ///
    /// # Errors
    /// Returns [`SkyError::InvalidConfig`] for invalid metadata,
    /// [`SkyError::MissingColumn`] if a position column is absent and
    /// [`SkyError::InvalidCoordinate`] for a row without a valid position.
    pub fn from_frame(metadata: CatalogMetadata, frame: PointFrame) -> SkyResult<Catalog> {
        metadata.validate()?;
        let positions = frame.positions(&metadata)?;

        let mut rows_by_trixel: BTreeMap<u64, (Trixel, Vec<usize>)> = BTreeMap::new();
        for (row, position) in positions.iter().enumerate() {
            let Some(position) = position else {
                log::error!(
                    "Row {} of catalog {} has no valid position",
                    frame.ids()[row],
                    metadata.name
                );
                return Err(SkyError::InvalidCoordinate(format!(
                    "row {} has an invalid position",
                    frame.ids()[row]
                )));
            };
            let trixel = Trixel::locate(position.to_vector(), metadata.partition_depth);
            rows_by_trixel
                .entry(trixel.id())
                .or_insert_with(|| (trixel, Vec::new()))
                .1
                .push(row);
        }

        let mut infos = Vec::with_capacity(rows_by_trixel.len());
        let mut partitions = BTreeMap::new();
        for (id, (trixel, rows)) in rows_by_trixel {
            infos.push(PartitionInfo {
                trixel,
                num_rows: rows.len(),
            });
            partitions.insert(id, frame.take(&rows));
        }

        let structure =
            PartitionStructure::new(metadata.name.clone(), metadata.partition_depth, infos);
        log::debug!(
            "Partitioned {} rows of catalog {} into {} partitions",
            frame.len(),
            metadata.name,
            structure.len()
        );

        Ok(Catalog {
            metadata: Arc::new(metadata),
            structure,
            partitions: Arc::new(partitions),
            template: frame.empty_like(),
            pending: Vec::new(),
        })
    }

    /// Applies a search and returns the narrowed catalog.
    pub fn search(&self, provider: impl SearchProvider) -> SkyResult<Catalog> {
        self.search_with(Search::new(provider))
    }

    /// Applies a shared search and returns the narrowed catalog.
    ///
    /// Partition pruning happens here; the point-level phase is deferred to
    /// [`Catalog::compute`] and skipped for searches with `fine() == false`.
    pub fn search_with(&self, search: Search) -> SkyResult<Catalog> {
        let structure = search.filter_partitions(&self.structure)?;
        let mut pending = self.pending.clone();
        if search.fine() {
            pending.push(search);
        }
        Ok(Catalog {
            metadata: Arc::clone(&self.metadata),
            structure,
            partitions: Arc::clone(&self.partitions),
            template: self.template.clone(),
            pending,
        })
    }

    /// Evaluates the queued searches and returns the matching rows,
    /// ordered by partition id.
    pub fn compute(&self) -> SkyResult<PointFrame> {
        let frames = self
            .structure
            .partitions()
            .par_iter()
            .map(|info| self.compute_partition(info.trixel.id()))
            .collect::<SkyResult<Vec<PointFrame>>>()?;
        PointFrame::concat(std::iter::once(&self.template).chain(frames.iter()))
    }

    fn compute_partition(&self, id: u64) -> SkyResult<PointFrame> {
        let Some(frame) = self.partitions.get(&id) else {
            return Ok(self.template.clone());
        };
        let mut current: Option<PointFrame> = None;
        for search in &self.pending {
            let input = current.as_ref().unwrap_or(frame);
            current = Some(search.search_points(input, &self.metadata)?);
        }
        let result = current.unwrap_or_else(|| frame.clone());
        log::trace!(
            "Partition {} kept {} of {} rows",
            id,
            result.len(),
            frame.len()
        );
        Ok(result)
    }

    /// The partitions that survived every search so far.
    pub fn hc_structure(&self) -> &PartitionStructure {
        &self.structure
    }

    pub fn metadata(&self) -> &CatalogMetadata {
        &self.metadata
    }

    /// Unfiltered rows of a partition that is still part of this catalog.
    pub fn partition(&self, id: u64) -> Option<&PointFrame> {
        if self.structure.partitions().iter().any(|p| p.trixel.id() == id) {
            self.partitions.get(&id)
        } else {
            None
        }
    }

    pub fn num_partitions(&self) -> usize {
        self.structure.len()
    }

    /// Number of queued point-level searches.
    pub fn pending_searches(&self) -> usize {
        self.pending.len()
    }
}

impl Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Catalog({}, partitions={}, pending={})",
            self.metadata.name,
            self.structure.len(),
            self.pending.len()
        )
    }
}
