use std::collections::HashMap;

use crate::models::MeasurementSeries;

/// Site code -> locally available measurement table.
pub trait MeasurementStore {
    fn series(&self, site_code: &str) -> Option<&MeasurementSeries>;

    fn contains(&self, site_code: &str) -> bool {
        self.series(site_code).is_some()
    }
}

/// Measurement tables held in memory, keyed by site code.
#[derive(Debug, Clone, Default)]
pub struct SiteDataStore {
    series: HashMap<String, MeasurementSeries>,
}

impl SiteDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a table, replacing any previous one for the same site
    pub fn insert(&mut self, series: MeasurementSeries) -> Option<MeasurementSeries> {
        self.series.insert(series.site_code().to_string(), series)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Site codes in sorted order
    pub fn site_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.series.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

impl FromIterator<MeasurementSeries> for SiteDataStore {
    fn from_iter<I: IntoIterator<Item = MeasurementSeries>>(iter: I) -> Self {
        let mut store = Self::new();
        for series in iter {
            store.insert(series);
        }
        store
    }
}

impl MeasurementStore for SiteDataStore {
    fn series(&self, site_code: &str) -> Option<&MeasurementSeries> {
        self.series.get(site_code)
    }
}
