//! Sky tiling schemes: tracts and patches.
//!
//! A tiling scheme divides the sky into tracts, and each tract into a grid of
//! patches. Searches only depend on the [`TilingScheme`] trait, so any scheme
//! that can describe its tracts as [`TractInfo`] values can drive a
//! tract/patch search. [`RingsSkyMap`] is the ring-based scheme used by
//! wide-field surveys.

mod config;
mod patch;
mod rings;
mod tract;

use std::sync::Arc;

use crate::errors::SkyResult;

pub use config::{RingsSkyMapConfig, RingsSkyMapConfigBuilder};
pub use patch::PatchInfo;
pub use rings::RingsSkyMap;
pub use tract::TractInfo;

/// A tiling of the sky into numbered tracts.
pub trait TilingScheme: Send + Sync {
    /// Name of this scheme instance.
    fn name(&self) -> &str;

    /// Number of tracts; valid ids are `0..num_tracts()`.
    fn num_tracts(&self) -> u32;

    /// Resolves the geometry of a tract.
    ///
    /// # Errors
    /// Returns [`SkyError::InvalidRegion`](crate::SkyError::InvalidRegion) if
    /// `tract_id` is out of range.
    fn tract(&self, tract_id: u32) -> SkyResult<Arc<TractInfo>>;
}
