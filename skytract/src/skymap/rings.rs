//! A tiling of the sphere into declination rings.
//!
//! The sphere is cut into `num_rings` bands of equal latitude height plus two
//! polar caps. Tract 0 is the south polar cap and the last tract is the north
//! polar cap; the tracts in between are numbered ring by ring from the south,
//! and within a ring eastward from `ra_start`. A ring holds enough tracts that
//! their longitude width, measured at the ring edge closest to the equator,
//! does not exceed the ring height.

use dashmap::DashMap;
use std::sync::Arc;

use super::config::RingsSkyMapConfig;
use super::tract::TractInfo;
use super::TilingScheme;
use crate::errors::{SkyError, SkyResult};
use crate::geometry::{normalize_lon, LonLat, LonLatBox};

/// A ring-based tiling scheme.
///
/// Tract geometry is generated on first use and shared afterwards, so one
/// skymap can serve many concurrent searches.
pub struct RingsSkyMap {
    name: String,
    config: RingsSkyMapConfig,
    ring_nums: Vec<u32>,
    ring_offsets: Vec<u32>,
    num_tracts: u32,
    tracts: DashMap<u32, Arc<TractInfo>>,
}

impl RingsSkyMap {
    /// Creates a skymap named `"rings"`.
    pub fn new(config: RingsSkyMapConfig) -> SkyResult<Self> {
        Self::with_name("rings", config)
    }

    /// Creates a named skymap.
    ///
    /// # Errors
    /// Returns [`SkyError::InvalidConfig`] if the configuration is invalid.
    pub fn with_name(name: impl Into<String>, config: RingsSkyMapConfig) -> SkyResult<Self> {
        config.validate()?;
        let ring_size = config.ring_size();

        let mut ring_nums = Vec::with_capacity(config.num_rings as usize);
        let mut ring_offsets = Vec::with_capacity(config.num_rings as usize);
        let mut offset = 1u32;
        for ring in 0..config.num_rings {
            let (start, stop) = ring_bounds(ring, ring_size);
            let closest_to_equator = if start <= 0.0 && stop >= 0.0 {
                0.0
            } else {
                start.abs().min(stop.abs())
            };
            let count = (360.0 * closest_to_equator.to_radians().cos() / ring_size).floor() as u32 + 1;
            ring_offsets.push(offset);
            ring_nums.push(count);
            offset += count;
        }
        let num_tracts = offset + 1;

        let name = name.into();
        log::debug!(
            "Created rings skymap {} with {} rings and {} tracts",
            name,
            config.num_rings,
            num_tracts
        );

        Ok(Self {
            name,
            config,
            ring_nums,
            ring_offsets,
            num_tracts,
            tracts: DashMap::new(),
        })
    }

    pub fn config(&self) -> &RingsSkyMapConfig {
        &self.config
    }

    /// Number of tracts in each ring, south to north.
    pub fn ring_nums(&self) -> &[u32] {
        &self.ring_nums
    }

    /// Id of the tract whose inner region holds `coord`.
    pub fn find_tract(&self, coord: &LonLat) -> u32 {
        let ring_size = self.config.ring_size();
        let lat = coord.lat();
        if lat < -90.0 + ring_size / 2.0 {
            return 0;
        }
        if lat >= 90.0 - ring_size / 2.0 {
            return self.num_tracts - 1;
        }
        let ring = (((lat + 90.0 - ring_size / 2.0) / ring_size).floor() as u32)
            .min(self.config.num_rings - 1);
        let count = self.ring_nums[ring as usize];
        let spacing = 360.0 / count as f64;
        let offset = normalize_lon(coord.lon() - self.config.ra_start + spacing / 2.0);
        let index = ((offset / spacing).floor() as u32).min(count - 1);
        self.ring_offsets[ring as usize] + index
    }

    /// Center and inner box of a tract.
    fn tract_layout(&self, tract_id: u32) -> SkyResult<(LonLat, LonLatBox)> {
        let ring_size = self.config.ring_size();
        if tract_id == 0 {
            let inner = LonLatBox::full_lon(-90.0, -90.0 + ring_size / 2.0)?;
            return Ok((LonLat::new(0.0, -90.0)?, inner));
        }
        if tract_id == self.num_tracts - 1 {
            let inner = LonLatBox::full_lon(90.0 - ring_size / 2.0, 90.0)?;
            return Ok((LonLat::new(0.0, 90.0)?, inner));
        }

        let ring = self
            .ring_offsets
            .partition_point(|offset| *offset <= tract_id)
            - 1;
        let index = tract_id - self.ring_offsets[ring];
        let count = self.ring_nums[ring];
        let spacing = 360.0 / count as f64;
        let (start, stop) = ring_bounds(ring as u32, ring_size);

        let lon = self.config.ra_start + index as f64 * spacing;
        let center = LonLat::new(lon, (start + stop) / 2.0)?;
        let inner = if count == 1 {
            LonLatBox::full_lon(start, stop)?
        } else {
            LonLatBox::new(lon - spacing / 2.0, lon + spacing / 2.0, start, stop)?
        };
        Ok((center, inner))
    }

    fn check_tract_id(&self, tract_id: u32) -> SkyResult<()> {
        if tract_id >= self.num_tracts {
            log::error!(
                "Tract {} out of range for skymap {} with {} tracts",
                tract_id,
                self.name,
                self.num_tracts
            );
            return Err(SkyError::InvalidRegion(format!(
                "tract {} out of range [0, {})",
                tract_id, self.num_tracts
            )));
        }
        Ok(())
    }
}

impl TilingScheme for RingsSkyMap {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_tracts(&self) -> u32 {
        self.num_tracts
    }

    fn tract(&self, tract_id: u32) -> SkyResult<Arc<TractInfo>> {
        self.check_tract_id(tract_id)?;
        if let Some(tract) = self.tracts.get(&tract_id) {
            return Ok(Arc::clone(tract.value()));
        }
        let (center, inner) = self.tract_layout(tract_id)?;
        let tract = Arc::new(TractInfo::build(tract_id, center, inner, &self.config)?);
        let entry = self.tracts.entry(tract_id).or_insert(tract);
        Ok(Arc::clone(entry.value()))
    }
}

/// Latitude bounds `[start, stop)` of a ring in degrees.
fn ring_bounds(ring: u32, ring_size: f64) -> (f64, f64) {
    let start = ring_size * (ring as f64 + 0.5) - 90.0;
    (start, start + ring_size)
}
