pub mod bucketed;
pub mod feature;
pub mod measurement;
pub mod pollutant;
pub mod site;

pub use bucketed::BucketedSeries;
pub use feature::{
    CollectionType, Feature, FeatureType, IconStyle, PlaybackOptions, PointGeometry,
    SiteLocationCollection, SiteMarker, TimedFeatureCollection,
};
pub use measurement::MeasurementSeries;
pub use pollutant::{Pollutant, PollutantCapability};
pub use site::SiteRecord;
