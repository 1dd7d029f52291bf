use crate::models::Pollutant;
use crate::processors::BoundEstimate;

/// Why a site or a weekly value did not become a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    NoLocalData,
    MissingColumn,
    MissingCoordinates,
    MissingValue,
    Outlier,
    DegenerateRange,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteStatistics {
    pub site_code: String,
    pub total_buckets: usize,
    pub emitted: usize,
    pub missing: usize,
    pub outliers: usize,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl SiteStatistics {
    pub fn new(site_code: &str) -> Self {
        Self {
            site_code: site_code.to_string(),
            ..Default::default()
        }
    }

    fn observe(&mut self, value: f64) {
        self.min_value = Some(self.min_value.map_or(value, |m| m.min(value)));
        self.max_value = Some(self.max_value.map_or(value, |m| m.max(value)));
    }
}

/// What one pollutant query kept and what it silently dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageReport {
    pub pollutant: Pollutant,
    pub column: String,
    pub relevant_sites: usize,
    pub sites_without_data: Vec<String>,
    pub sites_without_column: Vec<String>,
    pub sites_without_coordinates: Vec<String>,
    pub bounds: Option<BoundEstimate>,
    pub degenerate_exclusions: usize,
    /// Sites that reached feature building, in emission order
    pub site_statistics: Vec<SiteStatistics>,
}

impl CoverageReport {
    pub fn new(pollutant: Pollutant, relevant_sites: usize) -> Self {
        Self {
            pollutant,
            column: pollutant.column_name().to_string(),
            relevant_sites,
            sites_without_data: Vec::new(),
            sites_without_column: Vec::new(),
            sites_without_coordinates: Vec::new(),
            bounds: None,
            degenerate_exclusions: 0,
            site_statistics: Vec::new(),
        }
    }

    pub fn record_site_exclusion(&mut self, site_code: &str, reason: ExclusionReason) {
        let list = match reason {
            ExclusionReason::NoLocalData => &mut self.sites_without_data,
            ExclusionReason::MissingColumn => &mut self.sites_without_column,
            ExclusionReason::MissingCoordinates => &mut self.sites_without_coordinates,
            _ => return,
        };
        list.push(site_code.to_string());
    }

    /// Start tallying a site's buckets; returns its slot
    pub fn begin_site(&mut self, site_code: &str) -> usize {
        self.site_statistics.push(SiteStatistics::new(site_code));
        self.site_statistics.len() - 1
    }

    pub fn record_emitted(&mut self, slot: usize, value: f64) {
        let stats = &mut self.site_statistics[slot];
        stats.total_buckets += 1;
        stats.emitted += 1;
        stats.observe(value);
    }

    pub fn record_value_exclusion(&mut self, slot: usize, value: Option<f64>, reason: ExclusionReason) {
        let stats = &mut self.site_statistics[slot];
        stats.total_buckets += 1;
        match reason {
            ExclusionReason::MissingValue => stats.missing += 1,
            ExclusionReason::Outlier => stats.outliers += 1,
            ExclusionReason::DegenerateRange => self.degenerate_exclusions += 1,
            _ => {}
        }
        if let Some(value) = value {
            self.site_statistics[slot].observe(value);
        }
    }

    pub fn total_emitted(&self) -> usize {
        self.site_statistics.iter().map(|s| s.emitted).sum()
    }

    pub fn total_outliers(&self) -> usize {
        self.site_statistics.iter().map(|s| s.outliers).sum()
    }

    pub fn total_missing(&self) -> usize {
        self.site_statistics.iter().map(|s| s.missing).sum()
    }

    pub fn contributing_sites(&self) -> usize {
        self.site_statistics.iter().filter(|s| s.emitted > 0).count()
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str(&format!("=== Coverage Report: {} ===\n", self.pollutant));
        summary.push_str(&format!("Column: {}\n", self.column));
        summary.push_str(&format!("Relevant Sites: {}\n", self.relevant_sites));
        summary.push_str(&format!(
            "Contributing Sites: {}\n",
            self.contributing_sites()
        ));

        if let Some(bounds) = &self.bounds {
            summary.push_str(&format!(
                "Bounds: [{:.2}, {:.2}] (q25={:.2}, q75={:.2})\n",
                bounds.lower, bounds.upper, bounds.q25, bounds.q75
            ));
        }

        summary.push_str(&format!("Features Emitted: {}\n", self.total_emitted()));
        summary.push_str(&format!("Missing Weeks: {}\n", self.total_missing()));
        summary.push_str(&format!("Outliers Excluded: {}\n", self.total_outliers()));
        if self.degenerate_exclusions > 0 {
            summary.push_str(&format!(
                "Excluded By Degenerate Range: {}\n",
                self.degenerate_exclusions
            ));
        }

        let excluded = [
            ("No local data", &self.sites_without_data),
            ("Missing column", &self.sites_without_column),
            ("Missing coordinates", &self.sites_without_coordinates),
        ];
        for (label, sites) in excluded {
            if !sites.is_empty() {
                summary.push_str(&format!("{}: {}\n", label, sites.join(", ")));
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tallies() {
        let mut report = CoverageReport::new(Pollutant::Ozone, 3);
        report.record_site_exclusion("BX0", ExclusionReason::NoLocalData);

        let slot = report.begin_site("MY1");
        report.record_emitted(slot, 12.0);
        report.record_emitted(slot, 4.0);
        report.record_value_exclusion(slot, None, ExclusionReason::MissingValue);
        report.record_value_exclusion(slot, Some(900.0), ExclusionReason::Outlier);

        let stats = &report.site_statistics[0];
        assert_eq!(stats.total_buckets, 4);
        assert_eq!(stats.emitted, 2);
        assert_eq!(stats.min_value, Some(4.0));
        assert_eq!(stats.max_value, Some(900.0));
        assert_eq!(report.total_outliers(), 1);
        assert_eq!(report.total_missing(), 1);
        assert_eq!(report.contributing_sites(), 1);

        let summary = report.generate_summary();
        assert!(summary.contains("Coverage Report: O3"));
        assert!(summary.contains("Features Emitted: 2"));
        assert!(summary.contains("No local data: BX0"));
    }
}
