use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::{ProcessingError, Result};
use crate::models::{Pollutant, TimedFeatureCollection};
use crate::utils::constants::POPUP_LINE_BREAK;
use crate::writers::GeoJsonWriter;

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStatistics {
    pub pollutant: Pollutant,
    pub total_features: usize,
    pub unique_sites: usize,
    pub weeks_with_features: usize,
    pub date_range: (NaiveDate, NaiveDate),
    /// Week with the most features, earliest on ties
    pub busiest_week: (NaiveDate, usize),
    pub geographic_bounds: GeographicBounds,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeographicBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

pub struct CollectionAnalyzer;

impl CollectionAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze_file(&self, path: &Path) -> Result<CollectionStatistics> {
        let collection = GeoJsonWriter::new().read_collection(path)?;
        self.analyze(&collection)
    }

    pub fn analyze(&self, collection: &TimedFeatureCollection) -> Result<CollectionStatistics> {
        let Some(first) = collection.features.first() else {
            return Err(ProcessingError::InvalidFormat(format!(
                "Collection '{}' has no features to analyze",
                collection.name
            )));
        };

        let mut sites = BTreeSet::new();
        let mut per_week: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        let mut bounds = GeographicBounds {
            min_lat: first.geometry.latitude(),
            max_lat: first.geometry.latitude(),
            min_lon: first.geometry.longitude(),
            max_lon: first.geometry.longitude(),
        };

        for feature in &collection.features {
            let site_name = feature
                .popup()
                .split(POPUP_LINE_BREAK)
                .next()
                .unwrap_or_default();
            sites.insert(site_name);
            *per_week.entry(feature.date()).or_default() += 1;

            let (lat, lon) = (feature.geometry.latitude(), feature.geometry.longitude());
            bounds.min_lat = bounds.min_lat.min(lat);
            bounds.max_lat = bounds.max_lat.max(lat);
            bounds.min_lon = bounds.min_lon.min(lon);
            bounds.max_lon = bounds.max_lon.max(lon);
        }

        let mut busiest_week = (first.date(), 0);
        for (&week, &count) in &per_week {
            if count > busiest_week.1 {
                busiest_week = (week, count);
            }
        }

        // per_week is non-empty here
        let date_range = match (per_week.keys().next(), per_week.keys().next_back()) {
            (Some(&start), Some(&end)) => (start, end),
            _ => (first.date(), first.date()),
        };

        Ok(CollectionStatistics {
            pollutant: collection.pollutant,
            total_features: collection.len(),
            unique_sites: sites.len(),
            weeks_with_features: per_week.len(),
            date_range,
            busiest_week,
            geographic_bounds: bounds,
        })
    }
}

impl Default for CollectionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionStatistics {
    pub fn summary(&self) -> String {
        format!(
            "Pollutant: {} ({})\n\
            Sites: {} sites\n\
            Date Range: {} to {} ({} weeks with features)\n\
            Features: {} total\n\
            Coverage: {:.3}..{:.3} lat, {:.3}..{:.3} lon",
            self.pollutant,
            self.pollutant.column_name(),
            self.unique_sites,
            self.date_range.0,
            self.date_range.1,
            self.weeks_with_features,
            self.total_features,
            self.geographic_bounds.min_lat,
            self.geographic_bounds.max_lat,
            self.geographic_bounds.min_lon,
            self.geographic_bounds.max_lon,
        )
    }

    pub fn detailed_summary(&self) -> String {
        let weeks_spanned = (self.date_range.1 - self.date_range.0).num_weeks() + 1;
        let mut summary = self.summary();
        summary.push_str(&format!(
            "\nWeekly Coverage: {} of {} weeks ({:.1}%)\n\
            Busiest Week: {} ({} features)\n\
            Average Features per Week: {:.1}",
            self.weeks_with_features,
            weeks_spanned,
            self.weeks_with_features as f64 / weeks_spanned as f64 * 100.0,
            self.busiest_week.0,
            self.busiest_week.1,
            self.total_features as f64 / self.weeks_with_features as f64,
        ));
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Feature;
    use crate::processors::CollectionAssembler;

    #[test]
    fn test_analyze_collection() {
        let week = |d: u32| NaiveDate::from_ymd_opt(2021, 2, d).unwrap();
        let features = vec![
            Feature::new(51.5, -0.1, week(1), "#0d0887", "Alpha<br />1.00 x".into()),
            Feature::new(51.5, -0.1, week(15), "#0d0887", "Alpha<br />2.00 x".into()),
            Feature::new(51.3, -0.4, week(15), "#0d0887", "Beta<br />3.00 x".into()),
        ];
        let collection = CollectionAssembler::new().assemble(Pollutant::CarbonMonoxide, features);

        let stats = CollectionAnalyzer::new().analyze(&collection).unwrap();

        assert_eq!(stats.total_features, 3);
        assert_eq!(stats.unique_sites, 2);
        assert_eq!(stats.weeks_with_features, 2);
        assert_eq!(stats.date_range, (week(1), week(15)));
        assert_eq!(stats.busiest_week, (week(15), 2));
        assert_eq!(stats.geographic_bounds.min_lon, -0.4);

        let detailed = stats.detailed_summary();
        assert!(detailed.contains("2 of 3 weeks"));
        assert!(detailed.contains("Carbon Monoxide (mg/m3)"));
    }

    #[test]
    fn test_empty_collection_rejected() {
        let collection = CollectionAssembler::new().assemble(Pollutant::Ozone, Vec::new());
        assert!(CollectionAnalyzer::new().analyze(&collection).is_err());
    }
}
