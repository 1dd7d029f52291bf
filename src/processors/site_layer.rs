use crate::models::{CollectionType, SiteLocationCollection, SiteMarker};
use crate::processors::ResolvedPollutant;
use crate::sources::{MeasurementStore, SiteCatalog};

/// Grey base layer marking each site that can contribute to a pollutant map:
/// placed on the map, carrying the column, with at least one reading.
pub struct SiteLocationLayer;

impl SiteLocationLayer {
    pub fn new() -> Self {
        Self
    }

    pub fn build<C, S>(
        &self,
        resolved: &ResolvedPollutant,
        catalog: &C,
        store: &S,
    ) -> SiteLocationCollection
    where
        C: SiteCatalog + ?Sized,
        S: MeasurementStore + ?Sized,
    {
        let features = resolved
            .site_codes
            .iter()
            .filter_map(|code| {
                let site = catalog.site(code)?;
                let (latitude, longitude) = site.coordinates()?;
                let series = store.series(code)?;
                series
                    .has_readings(resolved.column)
                    .then(|| SiteMarker::new(latitude, longitude, site.name.clone()))
            })
            .collect();

        SiteLocationCollection {
            kind: CollectionType::FeatureCollection,
            name: "Sites".to_string(),
            features,
        }
    }
}

impl Default for SiteLocationLayer {
    fn default() -> Self {
        Self::new()
    }
}
