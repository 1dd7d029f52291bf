use chrono::NaiveDateTime;
use std::collections::BTreeMap;

use crate::error::{ProcessingError, Result};

/// Time-indexed table of named measurement columns for one site.
///
/// Rows are kept in timestamp order. Every column holds exactly one cell per
/// timestamp; `None` marks a missing reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSeries {
    site_code: String,
    timestamps: Vec<NaiveDateTime>,
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl MeasurementSeries {
    pub fn new(site_code: impl Into<String>) -> Self {
        Self {
            site_code: site_code.into(),
            ..Default::default()
        }
    }

    /// Build a series from column vectors, sorting rows chronologically.
    pub fn from_columns(
        site_code: impl Into<String>,
        timestamps: Vec<NaiveDateTime>,
        columns: BTreeMap<String, Vec<Option<f64>>>,
    ) -> Result<Self> {
        let site_code = site_code.into();

        for (name, cells) in &columns {
            if cells.len() != timestamps.len() {
                return Err(ProcessingError::InvalidFormat(format!(
                    "Column '{}' of site {} has {} cells for {} timestamps",
                    name,
                    site_code,
                    cells.len(),
                    timestamps.len()
                )));
            }
        }

        let mut order: Vec<usize> = (0..timestamps.len()).collect();
        order.sort_by_key(|&i| timestamps[i]);

        let sorted_timestamps = order.iter().map(|&i| timestamps[i]).collect();
        let sorted_columns = columns
            .into_iter()
            .map(|(name, cells)| {
                let sorted = order.iter().map(|&i| cells[i]).collect();
                (name, sorted)
            })
            .collect();

        Ok(Self {
            site_code,
            timestamps: sorted_timestamps,
            columns: sorted_columns,
        })
    }

    /// Single-column series, mostly useful for fixtures.
    pub fn from_samples(
        site_code: impl Into<String>,
        column: &str,
        samples: Vec<(NaiveDateTime, Option<f64>)>,
    ) -> Result<Self> {
        let (timestamps, cells): (Vec<_>, Vec<_>) = samples.into_iter().unzip();
        let mut columns = BTreeMap::new();
        columns.insert(column.to_string(), cells);
        Self::from_columns(site_code, timestamps, columns)
    }

    pub fn site_code(&self) -> &str {
        &self.site_code
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Samples of one column in chronological order, or `None` if the site
    /// never recorded that column.
    pub fn column(
        &self,
        column: &str,
    ) -> Option<impl Iterator<Item = (NaiveDateTime, Option<f64>)> + '_> {
        self.columns
            .get(column)
            .map(|cells| self.timestamps.iter().copied().zip(cells.iter().copied()))
    }

    /// True when the column exists and at least one reading is present
    pub fn has_readings(&self, column: &str) -> bool {
        self.columns
            .get(column)
            .is_some_and(|cells| cells.iter().any(Option::is_some))
    }

    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((*self.timestamps.first()?, *self.timestamps.last()?))
    }
}
