use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use crate::models::{BucketedSeries, MeasurementSeries};

/// Monday of the ISO week containing `timestamp`.
pub fn week_start(timestamp: NaiveDateTime) -> NaiveDate {
    let date = timestamp.date();
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

#[derive(Default)]
struct WeekAccumulator {
    sum: f64,
    count: usize,
}

/// Buckets a site's raw samples into calendar weeks by mean.
pub struct TemporalAggregator {
    fill_gaps: bool,
}

impl TemporalAggregator {
    pub fn new() -> Self {
        Self { fill_gaps: true }
    }

    /// Whether weeks without samples between the first and last sampled week
    /// are emitted as missing buckets
    pub fn with_fill_gaps(fill_gaps: bool) -> Self {
        Self { fill_gaps }
    }

    /// Weekly means of one column, or `None` if the site never recorded it.
    ///
    /// A week whose samples are all missing is a missing bucket, never zero.
    pub fn aggregate(&self, series: &MeasurementSeries, column: &str) -> Option<BucketedSeries> {
        let samples = series.column(column)?;

        let mut weeks: BTreeMap<NaiveDate, WeekAccumulator> = BTreeMap::new();
        for (timestamp, value) in samples {
            let week = weeks.entry(week_start(timestamp)).or_default();
            if let Some(value) = value {
                week.sum += value;
                week.count += 1;
            }
        }

        let mut buckets: BTreeMap<NaiveDate, Option<f64>> = weeks
            .into_iter()
            .map(|(week, acc)| {
                let mean = (acc.count > 0).then(|| acc.sum / acc.count as f64);
                (week, mean)
            })
            .collect();

        if self.fill_gaps {
            Self::fill_missing_weeks(&mut buckets);
        }

        Some(BucketedSeries::new(series.site_code(), column, buckets))
    }

    fn fill_missing_weeks(buckets: &mut BTreeMap<NaiveDate, Option<f64>>) {
        let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back())
        else {
            return;
        };

        let mut week = first;
        while week < last {
            buckets.entry(week).or_insert(None);
            week += Duration::weeks(1);
        }
    }
}

impl Default for TemporalAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const COLUMN: &str = "PM10 Particulate (ug/m3)";

    fn at(y: i32, m: u32, d: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start() {
        // 2021-04-05 is a Monday
        assert_eq!(week_start(at(2021, 4, 5, 0)), day(2021, 4, 5));
        assert_eq!(week_start(at(2021, 4, 11, 23)), day(2021, 4, 5));
        assert_eq!(week_start(at(2021, 4, 12, 0)), day(2021, 4, 12));
        // ISO week spanning a year boundary
        assert_eq!(week_start(at(2021, 1, 1, 12)), day(2020, 12, 28));
    }

    #[test]
    fn test_weekly_mean_ignores_missing() {
        let series = MeasurementSeries::from_samples(
            "MY1",
            COLUMN,
            vec![
                (at(2021, 4, 5, 0), Some(10.0)),
                (at(2021, 4, 6, 0), None),
                (at(2021, 4, 11, 23), Some(20.0)),
                (at(2021, 4, 12, 0), Some(7.0)),
            ],
        )
        .unwrap();

        let bucketed = TemporalAggregator::new().aggregate(&series, COLUMN).unwrap();
        let buckets: Vec<_> = bucketed.iter().collect();

        assert_eq!(
            buckets,
            vec![(day(2021, 4, 5), Some(15.0)), (day(2021, 4, 12), Some(7.0))]
        );
    }

    #[test]
    fn test_all_missing_week_is_missing_not_zero() {
        let series = MeasurementSeries::from_samples(
            "MY1",
            COLUMN,
            vec![
                (at(2021, 4, 5, 0), None),
                (at(2021, 4, 7, 0), None),
                (at(2021, 4, 12, 0), Some(3.0)),
            ],
        )
        .unwrap();

        let bucketed = TemporalAggregator::new().aggregate(&series, COLUMN).unwrap();

        assert_eq!(bucketed.get(day(2021, 4, 5)), None);
        assert_eq!(bucketed.iter().next(), Some((day(2021, 4, 5), None)));
        assert_eq!(bucketed.missing_count(), 1);
        assert_eq!(bucketed.values().collect::<Vec<_>>(), vec![3.0]);
    }

    #[test]
    fn test_empty_weeks_between_samples_are_filled_as_missing() {
        let series = MeasurementSeries::from_samples(
            "MY1",
            COLUMN,
            vec![(at(2021, 4, 5, 0), Some(1.0)), (at(2021, 4, 26, 0), Some(4.0))],
        )
        .unwrap();

        let filled = TemporalAggregator::new().aggregate(&series, COLUMN).unwrap();
        assert_eq!(
            filled.iter().collect::<Vec<_>>(),
            vec![
                (day(2021, 4, 5), Some(1.0)),
                (day(2021, 4, 12), None),
                (day(2021, 4, 19), None),
                (day(2021, 4, 26), Some(4.0)),
            ]
        );

        let sparse = TemporalAggregator::with_fill_gaps(false)
            .aggregate(&series, COLUMN)
            .unwrap();
        assert_eq!(sparse.len(), 2);
    }

    #[test]
    fn test_sites_align_on_calendar_grid() {
        let a = MeasurementSeries::from_samples("A", COLUMN, vec![(at(2021, 4, 6, 3), Some(1.0))])
            .unwrap();
        let b = MeasurementSeries::from_samples("B", COLUMN, vec![(at(2021, 4, 10, 17), Some(2.0))])
            .unwrap();

        let aggregator = TemporalAggregator::new();
        let weeks_a: Vec<_> = aggregator.aggregate(&a, COLUMN).unwrap().weeks().collect();
        let weeks_b: Vec<_> = aggregator.aggregate(&b, COLUMN).unwrap().weeks().collect();

        assert_eq!(weeks_a, weeks_b);
    }

    #[test]
    fn test_missing_column_and_empty_series() {
        let series = MeasurementSeries::from_samples("A", COLUMN, vec![]).unwrap();
        let aggregator = TemporalAggregator::new();

        assert!(aggregator.aggregate(&series, "Ozone (ug/m3)").is_none());
        assert!(aggregator.aggregate(&series, COLUMN).unwrap().is_empty());
    }
}
