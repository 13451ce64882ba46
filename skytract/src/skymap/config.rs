//! Configuration for ring-based skymaps.

use serde::{Deserialize, Serialize};

use crate::errors::{SkyError, SkyResult};

/// Geometry parameters of a [`RingsSkyMap`](super::RingsSkyMap).
///
/// The defaults describe the LSST "cells v1" skymap: 120 declination rings,
/// 1 arcminute tract overlap, 0.2"/pixel, 3200 x 3200 pixel patches with a
/// 100 pixel border.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingsSkyMapConfig {
    /// Number of declination rings between the two polar caps.
    pub num_rings: u32,
    /// Longitude of the first tract in each ring, in degrees.
    pub ra_start: f64,
    /// Minimum overlap between adjacent tracts, in degrees.
    pub tract_overlap: f64,
    /// Pixel scale in arcseconds per pixel.
    pub pixel_scale: f64,
    /// Patch size in pixels, excluding the border, as `[x, y]`.
    pub patch_inner_dimensions: [u32; 2],
    /// Border added around each patch's inner area, in pixels.
    pub patch_border: u32,
}

impl Default for RingsSkyMapConfig {
    fn default() -> Self {
        Self {
            num_rings: 120,
            ra_start: 0.0,
            tract_overlap: 1.0 / 60.0,
            pixel_scale: 0.2,
            patch_inner_dimensions: [3200, 3200],
            patch_border: 100,
        }
    }
}

impl RingsSkyMapConfig {
    /// Returns a builder starting from the default configuration.
    pub fn builder() -> RingsSkyMapConfigBuilder {
        RingsSkyMapConfigBuilder::new()
    }

    /// Checks that the configuration describes a valid tiling.
    ///
    /// # Errors
    /// Returns [`SkyError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> SkyResult<()> {
        if self.num_rings == 0 {
            return Err(invalid("num_rings must be at least 1".to_string()));
        }
        if !self.ra_start.is_finite() {
            return Err(invalid(format!("ra_start must be finite, got {}", self.ra_start)));
        }
        if !self.tract_overlap.is_finite() || self.tract_overlap < 0.0 {
            return Err(invalid(format!(
                "tract_overlap must be non-negative, got {}",
                self.tract_overlap
            )));
        }
        if self.tract_overlap >= self.ring_size() {
            return Err(invalid(format!(
                "tract_overlap {} must be smaller than the ring size {}",
                self.tract_overlap,
                self.ring_size()
            )));
        }
        if !self.pixel_scale.is_finite() || self.pixel_scale <= 0.0 {
            return Err(invalid(format!(
                "pixel_scale must be positive, got {}",
                self.pixel_scale
            )));
        }
        if self.patch_inner_dimensions.iter().any(|d| *d == 0) {
            return Err(invalid(format!(
                "patch_inner_dimensions must be positive, got {:?}",
                self.patch_inner_dimensions
            )));
        }
        Ok(())
    }

    /// Latitude height of each ring in degrees.
    pub fn ring_size(&self) -> f64 {
        180.0 / (self.num_rings as f64 + 1.0)
    }

    /// Pixel size in radians.
    pub fn pixel_size(&self) -> f64 {
        (self.pixel_scale / 3600.0).to_radians()
    }
}

fn invalid(message: String) -> SkyError {
    log::error!("Invalid skymap configuration: {}", message);
    SkyError::InvalidConfig(message)
}

/// Builder for [`RingsSkyMapConfig`].
///
/// The first invalid value is remembered and returned from
/// [`build`](Self::build).
///
/// ```rust
/// use skytract::RingsSkyMapConfig;
///
/// let config = RingsSkyMapConfig::builder()
///     .num_rings(60)
///     .patch_inner_dimensions([4000, 4000])
///     .build()
///     .unwrap();
/// assert_eq!(config.num_rings, 60);
/// ```
#[derive(Debug, Default)]
pub struct RingsSkyMapConfigBuilder {
    error: Option<SkyError>,
    config: RingsSkyMapConfig,
}

impl RingsSkyMapConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_rings(mut self, num_rings: u32) -> Self {
        self.config.num_rings = num_rings;
        self
    }

    pub fn ra_start(mut self, ra_start: f64) -> Self {
        self.config.ra_start = ra_start;
        self
    }

    pub fn tract_overlap(mut self, tract_overlap: f64) -> Self {
        self.config.tract_overlap = tract_overlap;
        self
    }

    pub fn pixel_scale(mut self, pixel_scale: f64) -> Self {
        if self.error.is_none() && (pixel_scale.is_nan() || pixel_scale <= 0.0) {
            self.error = Some(invalid(format!(
                "pixel_scale must be positive, got {}",
                pixel_scale
            )));
        }
        self.config.pixel_scale = pixel_scale;
        self
    }

    pub fn patch_inner_dimensions(mut self, dimensions: [u32; 2]) -> Self {
        self.config.patch_inner_dimensions = dimensions;
        self
    }

    pub fn patch_border(mut self, patch_border: u32) -> Self {
        self.config.patch_border = patch_border;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> SkyResult<RingsSkyMapConfig> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RingsSkyMapConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.ring_size() - 180.0 / 121.0).abs() < 1e-12);
    }

    #[test]
    fn test_builder() {
        let config = RingsSkyMapConfig::builder()
            .num_rings(10)
            .tract_overlap(0.5)
            .patch_border(0)
            .build()
            .unwrap();
        assert_eq!(config.num_rings, 10);
        assert_eq!(config.tract_overlap, 0.5);
        assert_eq!(config.patch_border, 0);
        assert_eq!(config.patch_inner_dimensions, [3200, 3200]);
    }

    #[test]
    fn test_builder_keeps_first_error() {
        let result = RingsSkyMapConfig::builder()
            .pixel_scale(-1.0)
            .num_rings(0)
            .build();
        match result {
            Err(SkyError::InvalidConfig(msg)) => assert!(msg.contains("pixel_scale")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_validation_errors() {
        assert!(RingsSkyMapConfig::builder().num_rings(0).build().is_err());
        assert!(RingsSkyMapConfig::builder()
            .patch_inner_dimensions([0, 10])
            .build()
            .is_err());
        assert!(RingsSkyMapConfig::builder()
            .num_rings(1)
            .tract_overlap(120.0)
            .build()
            .is_err());
        assert!(RingsSkyMapConfig::builder()
            .ra_start(f64::NAN)
            .build()
            .is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let config = RingsSkyMapConfig::builder().num_rings(40).build().unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: RingsSkyMapConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_serde_defaults_missing_fields() {
        let config: RingsSkyMapConfig = serde_json::from_str(r#"{"num_rings": 8}"#).unwrap();
        assert_eq!(config.num_rings, 8);
        assert_eq!(config.patch_border, 100);
    }
}
