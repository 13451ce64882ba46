use indexmap::IndexMap;

use super::metadata::CatalogMetadata;
use crate::errors::{SkyError, SkyResult};
use crate::geometry::LonLat;

/// A columnar block of catalog rows.
///
/// Every row has a `u64` id and one value per named `f64` column. Column
/// order is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointFrame {
    ids: Vec<u64>,
    columns: IndexMap<String, Vec<f64>>,
}

impl PointFrame {
    /// Creates a frame from ids and columns.
    ///
    /// # Errors
    /// Returns [`SkyError::ShapeMismatch`] if a column length differs from
    /// the number of ids.
    pub fn new(ids: Vec<u64>, columns: IndexMap<String, Vec<f64>>) -> SkyResult<Self> {
        for (name, values) in &columns {
            if values.len() != ids.len() {
                log::error!(
                    "Column {} has {} values for {} rows",
                    name,
                    values.len(),
                    ids.len()
                );
                return Err(SkyError::ShapeMismatch(format!(
                    "column {} has {} values, expected {}",
                    name,
                    values.len(),
                    ids.len()
                )));
            }
        }
        Ok(Self { ids, columns })
    }

    /// Creates a frame holding only position columns named by `metadata`.
    pub fn from_positions(
        ids: Vec<u64>,
        ra: Vec<f64>,
        dec: Vec<f64>,
        metadata: &CatalogMetadata,
    ) -> SkyResult<Self> {
        let mut columns = IndexMap::new();
        columns.insert(metadata.ra_column.clone(), ra);
        columns.insert(metadata.dec_column.clone(), dec);
        Self::new(ids, columns)
    }

    /// Adds or replaces a column.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> SkyResult<Self> {
        let name = name.into();
        if values.len() != self.ids.len() {
            return Err(SkyError::ShapeMismatch(format!(
                "column {} has {} values, expected {}",
                name,
                values.len(),
                self.ids.len()
            )));
        }
        self.columns.insert(name, values);
        Ok(self)
    }

    /// A frame with the same columns and no rows.
    pub fn empty_like(&self) -> Self {
        Self {
            ids: Vec::new(),
            columns: self
                .columns
                .keys()
                .map(|name| (name.clone(), Vec::new()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Values of a named column.
    ///
    /// # Errors
    /// Returns [`SkyError::MissingColumn`] if the column does not exist.
    pub fn column(&self, name: &str) -> SkyResult<&[f64]> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| SkyError::MissingColumn(name.to_string()))
    }

    /// Row positions read from the metadata's RA/Dec columns.
    ///
    /// Rows whose values are not a valid coordinate yield `None`.
    pub fn positions(&self, metadata: &CatalogMetadata) -> SkyResult<Vec<Option<LonLat>>> {
        let ra = self.column(&metadata.ra_column)?;
        let dec = self.column(&metadata.dec_column)?;
        Ok(ra
            .iter()
            .zip(dec)
            .map(|(ra, dec)| LonLat::new(*ra, *dec).ok())
            .collect())
    }

    /// Selects rows by index, in the given order.
    pub fn take(&self, rows: &[usize]) -> Self {
        Self {
            ids: rows.iter().map(|r| self.ids[*r]).collect(),
            columns: self
                .columns
                .iter()
                .map(|(name, values)| (name.clone(), rows.iter().map(|r| values[*r]).collect()))
                .collect(),
        }
    }

    /// Concatenates frames with identical column names.
    ///
    /// # Errors
    /// Returns [`SkyError::ShapeMismatch`] if the frames' columns differ.
    pub fn concat<'a>(frames: impl IntoIterator<Item = &'a PointFrame>) -> SkyResult<Self> {
        let mut frames = frames.into_iter();
        let Some(first) = frames.next() else {
            return Ok(Self::default());
        };
        let mut result = first.clone();
        for frame in frames {
            if !frame.columns.keys().eq(result.columns.keys()) {
                return Err(SkyError::ShapeMismatch(
                    "cannot concatenate frames with different columns".to_string(),
                ));
            }
            result.ids.extend_from_slice(&frame.ids);
            for (name, values) in &frame.columns {
                if let Some(target) = result.columns.get_mut(name) {
                    target.extend_from_slice(values);
                }
            }
        }
        Ok(result)
    }
}
