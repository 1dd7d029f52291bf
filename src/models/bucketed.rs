use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Weekly aggregate of one column of one site's measurements.
///
/// Keys are the Monday that starts each calendar week. `None` marks a week in
/// which no reading was present.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketedSeries {
    pub site_code: String,
    pub column: String,
    buckets: BTreeMap<NaiveDate, Option<f64>>,
}

impl BucketedSeries {
    pub fn new(
        site_code: impl Into<String>,
        column: impl Into<String>,
        buckets: BTreeMap<NaiveDate, Option<f64>>,
    ) -> Self {
        Self {
            site_code: site_code.into(),
            column: column.into(),
            buckets,
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, week_start: NaiveDate) -> Option<f64> {
        self.buckets.get(&week_start).copied().flatten()
    }

    /// All buckets in chronological order
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.buckets.iter().map(|(week, value)| (*week, *value))
    }

    pub fn weeks(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.buckets.keys().copied()
    }

    /// Non-missing bucket means in chronological order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.buckets.values().filter_map(|value| *value)
    }

    pub fn missing_count(&self) -> usize {
        self.buckets.values().filter(|value| value.is_none()).count()
    }
}
