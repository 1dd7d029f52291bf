use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{DEFAULT_IQR_MULTIPLIER, LOWER_QUARTILE, UPPER_QUARTILE};

/// Inlier range derived from the pooled quartiles of one pollutant query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundEstimate {
    pub lower: f64,
    pub upper: f64,
    pub q25: f64,
    pub q75: f64,
}

impl BoundEstimate {
    pub fn iqr(&self) -> f64 {
        self.q75 - self.q25
    }

    pub fn span(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn is_degenerate(&self) -> bool {
        self.span() == 0.0
    }

    /// Inclusive on both ends
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Position of `value` within the bounds, in [0, 1] for inliers.
    pub fn normalize(&self, value: f64) -> Result<f64> {
        if self.is_degenerate() {
            return Err(ProcessingError::DegenerateRange { value: self.lower });
        }
        Ok((value - self.lower) / self.span())
    }
}

/// Quantile by linear interpolation between closest ranks: the value at
/// fractional position `p * (n - 1)` of the sorted sample.
pub fn quantile_linear(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }

    let position = p * (sorted.len() - 1) as f64;
    let below = position.floor() as usize;
    let above = position.ceil() as usize;
    let fraction = position - below as f64;

    Some(sorted[below] + (sorted[above] - sorted[below]) * fraction)
}

/// Tukey fences over the pooled weekly values of every relevant site.
pub struct RobustBoundEstimator {
    iqr_multiplier: f64,
}

impl RobustBoundEstimator {
    pub fn new() -> Self {
        Self {
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }

    pub fn with_iqr_multiplier(iqr_multiplier: f64) -> Self {
        Self { iqr_multiplier }
    }

    pub fn iqr_multiplier(&self) -> f64 {
        self.iqr_multiplier
    }

    /// `column` only labels the error when nothing was pooled.
    pub fn estimate<I>(&self, values: I, column: &str) -> Result<BoundEstimate>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut pooled: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if pooled.is_empty() {
            return Err(ProcessingError::EmptyDistribution {
                column: column.to_string(),
            });
        }
        pooled.sort_by(f64::total_cmp);

        let empty = || ProcessingError::EmptyDistribution {
            column: column.to_string(),
        };
        let q25 = quantile_linear(&pooled, LOWER_QUARTILE).ok_or_else(empty)?;
        let q75 = quantile_linear(&pooled, UPPER_QUARTILE).ok_or_else(empty)?;
        let iqr = q75 - q25;

        Ok(BoundEstimate {
            lower: q25 - self.iqr_multiplier * iqr,
            upper: q75 + self.iqr_multiplier * iqr,
            q25,
            q75,
        })
    }
}

impl Default for RobustBoundEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_quantile_linear() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_linear(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile_linear(&sorted, 1.0), Some(4.0));
        assert_eq!(quantile_linear(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile_linear(&[7.0], 0.75), Some(7.0));
        assert_eq!(quantile_linear(&[], 0.5), None);
        assert_eq!(quantile_linear(&sorted, 1.5), None);
    }

    #[test]
    fn test_bounds_with_outlier() {
        let values = vec![100.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let bounds = RobustBoundEstimator::new().estimate(values, "x").unwrap();

        assert_close(bounds.q25, 3.25);
        assert_close(bounds.q75, 7.75);
        assert_close(bounds.iqr(), 4.5);
        assert_close(bounds.upper, 14.5);
        assert_close(bounds.lower, -3.5);
        assert!(!bounds.contains(100.0));
        assert!(bounds.contains(9.0));
        assert!(bounds.contains(bounds.upper));
        assert!(bounds.contains(bounds.lower));
    }

    #[test]
    fn test_two_distinct_values_are_not_degenerate() {
        let bounds = RobustBoundEstimator::new()
            .estimate(vec![5.0, 500.0], "x")
            .unwrap();

        assert_close(bounds.q25, 128.75);
        assert_close(bounds.q75, 376.25);
        assert_close(bounds.lower, -242.5);
        assert_close(bounds.upper, 747.5);
        assert!(!bounds.is_degenerate());
        assert!(bounds.contains(5.0) && bounds.contains(500.0));
    }

    #[test]
    fn test_empty_distribution() {
        let result = RobustBoundEstimator::new().estimate(Vec::new(), "Ozone (ug/m3)");
        assert!(matches!(
            result,
            Err(ProcessingError::EmptyDistribution { column }) if column == "Ozone (ug/m3)"
        ));

        let result = RobustBoundEstimator::new().estimate(vec![f64::NAN], "x");
        assert!(matches!(result, Err(ProcessingError::EmptyDistribution { .. })));
    }

    #[test]
    fn test_zero_spread_is_degenerate() {
        let bounds = RobustBoundEstimator::new()
            .estimate(vec![42.0, 42.0, 42.0], "x")
            .unwrap();

        assert!(bounds.lower <= bounds.upper);
        assert!(bounds.is_degenerate());
        assert!(bounds.contains(42.0));
        assert!(matches!(
            bounds.normalize(42.0),
            Err(ProcessingError::DegenerateRange { value }) if value == 42.0
        ));
    }

    #[test]
    fn test_normalize() {
        let bounds = BoundEstimate {
            lower: -2.0,
            upper: 8.0,
            q25: 1.0,
            q75: 5.0,
        };
        assert_close(bounds.normalize(-2.0).unwrap(), 0.0);
        assert_close(bounds.normalize(3.0).unwrap(), 0.5);
        assert_close(bounds.normalize(8.0).unwrap(), 1.0);
    }

    #[test]
    fn test_custom_multiplier() {
        let bounds = RobustBoundEstimator::with_iqr_multiplier(3.0)
            .estimate(vec![1.0, 2.0, 3.0, 4.0, 5.0], "x")
            .unwrap();
        // q25 = 2, q75 = 4
        assert_close(bounds.lower, -4.0);
        assert_close(bounds.upper, 10.0);
    }
}
