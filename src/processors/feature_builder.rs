use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{BucketedSeries, Feature, SiteRecord};
use crate::processors::{BoundEstimate, ColorEncoder, CoverageReport, ExclusionReason};
use crate::utils::constants::{DEGENERATE_MIDPOINT, POPUP_LINE_BREAK, VALUE_DECIMALS};

/// What to do with inliers when the pooled bounds collapse to a single value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DegenerateRangePolicy {
    /// Every inlier is drawn at the middle of the colour scale
    #[default]
    Midpoint,
    /// The layer is emitted without features
    ExcludeAll,
    /// The query fails with `DegenerateRange`
    Fail,
}

impl FromStr for DegenerateRangePolicy {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "midpoint" => Ok(DegenerateRangePolicy::Midpoint),
            "exclude-all" | "exclude" => Ok(DegenerateRangePolicy::ExcludeAll),
            "fail" => Ok(DegenerateRangePolicy::Fail),
            other => Err(ProcessingError::InvalidFormat(format!(
                "Unknown degenerate-range policy: '{}' (expected midpoint, exclude-all or fail)",
                other
            ))),
        }
    }
}

impl fmt::Display for DegenerateRangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DegenerateRangePolicy::Midpoint => "midpoint",
            DegenerateRangePolicy::ExcludeAll => "exclude-all",
            DegenerateRangePolicy::Fail => "fail",
        };
        f.write_str(name)
    }
}

/// A relevant site paired with its weekly series for one query.
#[derive(Debug, Clone)]
pub struct SiteBuckets<'a> {
    pub site: &'a SiteRecord,
    pub buckets: BucketedSeries,
}

/// Outcome of placing one weekly value on the colour scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Level(f64),
    Excluded(ExclusionReason),
}

pub struct FeatureBuilder {
    encoder: ColorEncoder,
    degenerate_policy: DegenerateRangePolicy,
}

impl FeatureBuilder {
    pub fn new() -> Self {
        Self {
            encoder: ColorEncoder::new(),
            degenerate_policy: DegenerateRangePolicy::default(),
        }
    }

    pub fn with_degenerate_policy(degenerate_policy: DegenerateRangePolicy) -> Self {
        Self {
            encoder: ColorEncoder::new(),
            degenerate_policy,
        }
    }

    pub fn degenerate_policy(&self) -> DegenerateRangePolicy {
        self.degenerate_policy
    }

    /// Fails only under `DegenerateRangePolicy::Fail` with collapsed bounds
    pub fn check_bounds(&self, bounds: &BoundEstimate) -> Result<()> {
        if bounds.is_degenerate() && self.degenerate_policy == DegenerateRangePolicy::Fail {
            return Err(ProcessingError::DegenerateRange {
                value: bounds.lower,
            });
        }
        Ok(())
    }

    /// Normalized level of a present weekly value, or why it is left off the
    /// map. Bounds are compared against the raw value.
    pub fn place(&self, value: f64, bounds: &BoundEstimate) -> Result<Placement> {
        if !bounds.contains(value) {
            return Ok(Placement::Excluded(ExclusionReason::Outlier));
        }

        match bounds.normalize(value) {
            Ok(level) => Ok(Placement::Level(level)),
            Err(ProcessingError::DegenerateRange { value }) => match self.degenerate_policy {
                DegenerateRangePolicy::Midpoint => Ok(Placement::Level(DEGENERATE_MIDPOINT)),
                DegenerateRangePolicy::ExcludeAll => {
                    Ok(Placement::Excluded(ExclusionReason::DegenerateRange))
                }
                DegenerateRangePolicy::Fail => Err(ProcessingError::DegenerateRange { value }),
            },
            Err(e) => Err(e),
        }
    }

    /// Features for every surviving (site, week) pair: sites in the given
    /// order, weeks chronologically.
    pub fn build(
        &self,
        column: &str,
        sites: &[SiteBuckets<'_>],
        bounds: &BoundEstimate,
        report: &mut CoverageReport,
    ) -> Result<Vec<Feature>> {
        self.check_bounds(bounds)?;

        let mut features = Vec::new();
        for entry in sites {
            let site = entry.site;
            let Some((latitude, longitude)) = site.coordinates() else {
                debug!(site = %site.code, "no coordinates, site left off the map");
                report.record_site_exclusion(&site.code, ExclusionReason::MissingCoordinates);
                continue;
            };

            let slot = report.begin_site(&site.code);
            for (week, value) in entry.buckets.iter() {
                let Some(value) = value else {
                    report.record_value_exclusion(slot, None, ExclusionReason::MissingValue);
                    continue;
                };

                match self.place(value, bounds)? {
                    Placement::Level(level) => {
                        let color = self.encoder.encode(level)?;
                        let popup = popup_text(&site.name, value, column);
                        features.push(Feature::new(latitude, longitude, week, &color, popup));
                        report.record_emitted(slot, value);
                    }
                    Placement::Excluded(reason) => {
                        report.record_value_exclusion(slot, Some(value), reason);
                    }
                }
            }
        }

        Ok(features)
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `"<site name><br /><value to 2 dp> <column>"`
pub fn popup_text(site_name: &str, value: f64, column: &str) -> String {
    format!(
        "{}{}{:.*} {}",
        site_name, POPUP_LINE_BREAK, VALUE_DECIMALS, value, column
    )
}
