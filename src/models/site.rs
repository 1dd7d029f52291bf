use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Pollutant, PollutantCapability};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SiteRecord {
    #[validate(length(min = 1))]
    pub code: String,

    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    pub species: PollutantCapability,
}

impl SiteRecord {
    pub fn new(
        code: String,
        name: String,
        latitude: Option<f64>,
        longitude: Option<f64>,
        species: PollutantCapability,
    ) -> Self {
        Self {
            code,
            name,
            latitude,
            longitude,
            species,
        }
    }

    /// `(latitude, longitude)` when both are known
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn monitors(&self, pollutant: Pollutant) -> bool {
        self.species.supports(pollutant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(latitude: Option<f64>, longitude: Option<f64>) -> SiteRecord {
        SiteRecord::new(
            "MY1".to_string(),
            "Westminster - Marylebone Road".to_string(),
            latitude,
            longitude,
            PollutantCapability::Multiple(vec!["NO2".to_string(), "PM10".to_string()]),
        )
    }

    #[test]
    fn test_site_validation() {
        let record = site(Some(51.52254), Some(-0.15459));

        assert!(record.validate().is_ok());
        assert_eq!(record.coordinates(), Some((51.52254, -0.15459)));
        assert!(record.monitors(Pollutant::NitrogenDioxide));
        assert!(!record.monitors(Pollutant::Ozone));
    }

    #[test]
    fn test_missing_coordinates_are_valid_but_unplaceable() {
        let record = site(Some(51.5), None);

        assert!(record.validate().is_ok());
        assert_eq!(record.coordinates(), None);
        assert_eq!(site(None, None).coordinates(), None);
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(site(Some(91.0), Some(-0.1)).validate().is_err());
        assert!(site(Some(51.5), Some(181.0)).validate().is_err());
    }
}
