pub mod bound_estimator;
pub mod collection_assembler;
pub mod color_encoder;
pub mod coverage_report;
pub mod feature_builder;
pub mod heatmap;
pub mod pipeline;
pub mod pollutant_resolver;
pub mod site_layer;
pub mod temporal_aggregator;

pub use bound_estimator::{quantile_linear, BoundEstimate, RobustBoundEstimator};
pub use collection_assembler::CollectionAssembler;
pub use color_encoder::ColorEncoder;
pub use coverage_report::{CoverageReport, ExclusionReason, SiteStatistics};
pub use feature_builder::{popup_text, DegenerateRangePolicy, FeatureBuilder, Placement, SiteBuckets};
pub use heatmap::HeatmapFrames;
pub use pipeline::{PipelineOptions, PreparedQuery, TimeMapPipeline};
pub use pollutant_resolver::{PollutantResolver, ResolvedPollutant};
pub use site_layer::SiteLocationLayer;
pub use temporal_aggregator::{week_start, TemporalAggregator};
