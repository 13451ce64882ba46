use serde::{Deserialize, Serialize};

use crate::errors::{SkyError, SkyResult};

/// Deepest supported HTM partition depth.
pub const MAX_PARTITION_DEPTH: u8 = 20;

/// Catalog properties consulted when partitioning and filtering rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogMetadata {
    /// Catalog name.
    pub name: String,
    /// Column holding right ascension in degrees.
    pub ra_column: String,
    /// Column holding declination in degrees.
    pub dec_column: String,
    /// HTM depth at which rows are partitioned.
    pub partition_depth: u8,
}

impl Default for CatalogMetadata {
    fn default() -> Self {
        Self {
            name: "catalog".to_string(),
            ra_column: "ra".to_string(),
            dec_column: "dec".to_string(),
            partition_depth: 7,
        }
    }
}

impl CatalogMetadata {
    /// Metadata with default columns and depth.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_columns(mut self, ra_column: impl Into<String>, dec_column: impl Into<String>) -> Self {
        self.ra_column = ra_column.into();
        self.dec_column = dec_column.into();
        self
    }

    pub fn with_partition_depth(mut self, depth: u8) -> Self {
        self.partition_depth = depth;
        self
    }

    pub fn validate(&self) -> SkyResult<()> {
        if self.partition_depth > MAX_PARTITION_DEPTH {
            log::error!(
                "Partition depth {} exceeds maximum {}",
                self.partition_depth,
                MAX_PARTITION_DEPTH
            );
            return Err(SkyError::InvalidConfig(format!(
                "partition depth {} exceeds maximum {}",
                self.partition_depth, MAX_PARTITION_DEPTH
            )));
        }
        if self.ra_column.is_empty() || self.dec_column.is_empty() {
            return Err(SkyError::InvalidConfig(
                "position column names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let meta = CatalogMetadata::new("small_sky");
        assert_eq!(meta.name, "small_sky");
        assert_eq!(meta.ra_column, "ra");
        assert_eq!(meta.dec_column, "dec");
        assert!(meta.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let meta = CatalogMetadata::new("deep").with_partition_depth(21);
        assert!(matches!(meta.validate(), Err(SkyError::InvalidConfig(_))));
        let meta = CatalogMetadata::new("cols").with_columns("", "dec");
        assert!(meta.validate().is_err());
    }

    #[test]
    fn test_serde() {
        let meta: CatalogMetadata =
            serde_json::from_str(r#"{"name": "obj", "ra_column": "RA_deg"}"#).unwrap();
        assert_eq!(meta.ra_column, "RA_deg");
        assert_eq!(meta.dec_column, "dec");
        assert_eq!(meta.partition_depth, 7);
    }
}
