use rayon::prelude::*;
use tracing::{debug, info, info_span};

use crate::error::Result;
use crate::models::{PlaybackOptions, Pollutant, SiteLocationCollection, TimedFeatureCollection};
use crate::processors::{
    BoundEstimate, CollectionAssembler, CoverageReport, DegenerateRangePolicy, ExclusionReason,
    FeatureBuilder, HeatmapFrames, PollutantResolver, ResolvedPollutant, RobustBoundEstimator,
    SiteBuckets, SiteLocationLayer, TemporalAggregator,
};
use crate::sources::{MeasurementStore, SiteCatalog};
use crate::utils::constants::DEFAULT_IQR_MULTIPLIER;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub iqr_multiplier: f64,
    pub degenerate_policy: DegenerateRangePolicy,
    pub playback: PlaybackOptions,
    /// Emit weeks without samples as missing buckets
    pub fill_gaps: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            degenerate_policy: DegenerateRangePolicy::default(),
            playback: PlaybackOptions::default(),
            fill_gaps: true,
        }
    }
}

/// A query after resolution, aggregation and bound estimation.
#[derive(Debug, Clone)]
pub struct PreparedQuery<'a> {
    pub resolved: ResolvedPollutant,
    /// Relevant sites holding the column, in resolver order
    pub sites: Vec<SiteBuckets<'a>>,
    pub bounds: BoundEstimate,
    pub report: CoverageReport,
}

/// Turns a pollutant code into a time-sliced feature collection over
/// read-only catalog and measurement snapshots.
pub struct TimeMapPipeline<'a, C: SiteCatalog + ?Sized, S: MeasurementStore + ?Sized> {
    catalog: &'a C,
    store: &'a S,
    options: PipelineOptions,
}

impl<'a, C, S> TimeMapPipeline<'a, C, S>
where
    C: SiteCatalog + ?Sized,
    S: MeasurementStore + ?Sized,
{
    pub fn new(catalog: &'a C, store: &'a S) -> Self {
        Self::with_options(catalog, store, PipelineOptions::default())
    }

    pub fn with_options(catalog: &'a C, store: &'a S, options: PipelineOptions) -> Self {
        Self {
            catalog,
            store,
            options,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn run(&self, code: &str) -> Result<TimedFeatureCollection> {
        self.run_with_report(code).map(|(collection, _)| collection)
    }

    pub fn run_with_report(&self, code: &str) -> Result<(TimedFeatureCollection, CoverageReport)> {
        let span = info_span!("timemap", pollutant = %code.trim());
        let _guard = span.enter();

        let PreparedQuery {
            resolved,
            sites,
            bounds,
            mut report,
        } = self.prepare(code)?;

        let features = self
            .feature_builder()
            .build(resolved.column, &sites, &bounds, &mut report)?;

        info!(
            features = features.len(),
            contributing_sites = report.contributing_sites(),
            outliers = report.total_outliers(),
            "collection built"
        );

        let collection = CollectionAssembler::with_playback(self.options.playback.clone())
            .assemble(resolved.pollutant, features);

        Ok((collection, report))
    }

    /// Resolve, aggregate every relevant site and estimate pooled bounds
    pub fn prepare(&self, code: &str) -> Result<PreparedQuery<'a>> {
        let resolved = PollutantResolver::new().resolve(code, self.catalog)?;
        let mut report = CoverageReport::new(resolved.pollutant, resolved.site_codes.len());
        debug!(
            column = resolved.column,
            sites = resolved.site_codes.len(),
            "pollutant resolved"
        );

        let aggregator = TemporalAggregator::with_fill_gaps(self.options.fill_gaps);
        let catalog: &'a C = self.catalog;
        let store: &'a S = self.store;

        let mut sites = Vec::with_capacity(resolved.site_codes.len());
        for code in &resolved.site_codes {
            let Some(site) = catalog.site(code) else {
                continue;
            };
            let Some(series) = store.series(code) else {
                debug!(site = %code, "no local data");
                report.record_site_exclusion(code, ExclusionReason::NoLocalData);
                continue;
            };
            match aggregator.aggregate(series, resolved.column) {
                Some(buckets) => sites.push(SiteBuckets { site, buckets }),
                None => {
                    debug!(site = %code, column = resolved.column, "column not recorded");
                    report.record_site_exclusion(code, ExclusionReason::MissingColumn);
                }
            }
        }

        let pooled = sites.iter().flat_map(|entry| entry.buckets.values());
        let bounds = RobustBoundEstimator::with_iqr_multiplier(self.options.iqr_multiplier)
            .estimate(pooled, resolved.column)?;
        debug!(
            lower = bounds.lower,
            upper = bounds.upper,
            degenerate = bounds.is_degenerate(),
            "bounds estimated"
        );
        report.bounds = Some(bounds);

        Ok(PreparedQuery {
            resolved,
            sites,
            bounds,
            report,
        })
    }

    pub fn heatmap(&self, code: &str) -> Result<HeatmapFrames> {
        let prepared = self.prepare(code)?;
        HeatmapFrames::build(
            prepared.resolved.pollutant,
            &prepared.sites,
            &prepared.bounds,
            &self.feature_builder(),
        )
    }

    pub fn site_layer(&self, code: &str) -> Result<SiteLocationCollection> {
        let resolved = PollutantResolver::new().resolve(code, self.catalog)?;
        Ok(SiteLocationLayer::new().build(&resolved, self.catalog, self.store))
    }

    fn feature_builder(&self) -> FeatureBuilder {
        FeatureBuilder::with_degenerate_policy(self.options.degenerate_policy)
    }
}

impl<'a, C, S> TimeMapPipeline<'a, C, S>
where
    C: SiteCatalog + Sync + ?Sized,
    S: MeasurementStore + Sync + ?Sized,
{
    /// Independent queries in parallel. Results keep the input order and one
    /// failed query leaves the others untouched.
    pub fn run_many(
        &self,
        pollutants: &[Pollutant],
    ) -> Vec<(Pollutant, Result<(TimedFeatureCollection, CoverageReport)>)> {
        pollutants
            .par_iter()
            .map(|&pollutant| (pollutant, self.run_with_report(pollutant.code())))
            .collect()
    }
}
