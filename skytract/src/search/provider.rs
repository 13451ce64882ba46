use std::any::Any;
use std::fmt::{self, Display};
use std::ops::Deref;
use std::sync::Arc;

use crate::catalog::{CatalogMetadata, PartitionStructure, PointFrame};
use crate::errors::SkyResult;

/// A two-phase spatial search the catalog engine can run.
///
/// The engine calls [`filter_partitions`](SearchProvider::filter_partitions)
/// once, when the search is applied, to drop partitions that cannot hold a
/// match. If [`fine`](SearchProvider::fine) is true it later calls
/// [`search_points`](SearchProvider::search_points) on every surviving
/// partition, possibly in parallel and in any order.
pub trait SearchProvider: Any + Send + Sync + Display {
    /// Whether the point-level phase runs.
    fn fine(&self) -> bool;

    /// Coarse phase: the partitions that may hold matching rows.
    ///
    /// Must never drop a partition holding a row that
    /// [`search_points`](SearchProvider::search_points) would keep.
    fn filter_partitions(&self, structure: &PartitionStructure) -> SkyResult<PartitionStructure>;

    /// Fine phase: the rows of one partition that match.
    fn search_points(
        &self,
        frame: &PointFrame,
        metadata: &CatalogMetadata,
    ) -> SkyResult<PointFrame>;

    fn as_any(&self) -> &dyn Any;
}

/// A shareable handle to a [`SearchProvider`].
#[derive(Clone)]
pub struct Search {
    inner: Arc<dyn SearchProvider>,
}

impl Search {
    pub fn new<T: SearchProvider + 'static>(inner: T) -> Self {
        Search {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for Search {
    type Target = Arc<dyn SearchProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Display for Search {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl fmt::Debug for Search {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Search({})", self.inner)
    }
}
