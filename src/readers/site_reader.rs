use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{ProcessingError, Result};
use crate::models::{PollutantCapability, SiteRecord};
use crate::sources::SiteIndex;
use crate::utils::coordinates::{parse_optional_coordinate, validate_coordinates};

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(rename = "Sites")]
    sites: RawSites,
}

#[derive(Debug, Deserialize)]
struct RawSites {
    #[serde(rename = "Site", default)]
    site: OneOrMany<RawSite>,
}

/// The catalog emits a bare object where a list holds a single element.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawSite {
    #[serde(rename = "@SiteCode")]
    code: String,
    #[serde(rename = "@SiteName", default)]
    name: String,
    #[serde(rename = "@Latitude", default)]
    latitude: Option<RawCoordinate>,
    #[serde(rename = "@Longitude", default)]
    longitude: Option<RawCoordinate>,
    #[serde(rename = "Species", default)]
    species: Option<OneOrMany<RawSpecies>>,
}

#[derive(Debug, Deserialize)]
struct RawSpecies {
    #[serde(rename = "@SpeciesCode")]
    code: String,
}

/// Reads the monitoring-site catalog (`{"Sites": {"Site": [...]}}`).
pub struct SiteCatalogReader;

impl SiteCatalogReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_catalog(&self, path: &Path) -> Result<SiteIndex> {
        let text = fs::read_to_string(path)?;
        let sites = self.parse_sites(&text)?;
        SiteIndex::new(sites)
    }

    pub fn parse_sites(&self, json: &str) -> Result<Vec<SiteRecord>> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        raw.sites
            .site
            .into_vec()
            .into_iter()
            .map(|site| self.convert_site(site))
            .collect()
    }

    fn convert_site(&self, raw: RawSite) -> Result<SiteRecord> {
        let code = raw.code.trim().to_string();
        if code.is_empty() {
            return Err(ProcessingError::InvalidFormat(
                "Site entry without a site code".to_string(),
            ));
        }

        let latitude = Self::coordinate(raw.latitude)?;
        let longitude = Self::coordinate(raw.longitude)?;
        if let (Some(lat), Some(lon)) = (latitude, longitude) {
            validate_coordinates(lat, lon)?;
        }

        let species = match raw.species {
            None => PollutantCapability::None,
            Some(OneOrMany::One(species)) => PollutantCapability::Single(species.code),
            Some(OneOrMany::Many(list)) => {
                PollutantCapability::Multiple(list.into_iter().map(|s| s.code).collect())
            }
        };

        Ok(SiteRecord::new(
            code,
            raw.name.trim().to_string(),
            latitude,
            longitude,
            species,
        ))
    }

    fn coordinate(raw: Option<RawCoordinate>) -> Result<Option<f64>> {
        match raw {
            None => Ok(None),
            Some(RawCoordinate::Number(value)) => Ok(Some(value)),
            Some(RawCoordinate::Text(text)) => parse_optional_coordinate(&text),
        }
    }
}

impl Default for SiteCatalogReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pollutant;
    use crate::sources::SiteCatalog;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CATALOG: &str = r#"{
        "Sites": {
            "Site": [
                {
                    "@SiteCode": "MY1",
                    "@SiteName": "Westminster - Marylebone Road",
                    "@Latitude": "51.52254",
                    "@Longitude": "-0.15459",
                    "Species": [
                        {"@SpeciesCode": "NO2", "@SpeciesDescription": "Nitrogen Dioxide"},
                        {"@SpeciesCode": "PM10"}
                    ]
                },
                {
                    "@SiteCode": "BX0",
                    "@SiteName": "Bexley - Belvedere FDMS",
                    "@Latitude": "",
                    "@Longitude": "",
                    "Species": {"@SpeciesCode": "PM25"}
                },
                {
                    "@SiteCode": "ZZ1",
                    "@SiteName": "Closed site"
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_both_species_shapes() {
        let sites = SiteCatalogReader::new().parse_sites(CATALOG).unwrap();

        assert_eq!(sites.len(), 3);
        assert_eq!(sites[0].code, "MY1");
        assert_eq!(sites[0].coordinates(), Some((51.52254, -0.15459)));
        assert!(sites[0].monitors(Pollutant::NitrogenDioxide));
        assert!(sites[0].monitors(Pollutant::Pm10));

        assert_eq!(sites[1].coordinates(), None);
        assert_eq!(
            sites[1].species,
            PollutantCapability::Single("PM25".to_string())
        );

        assert_eq!(sites[2].species, PollutantCapability::None);
    }

    #[test]
    fn test_single_site_object() {
        let json = r#"{"Sites": {"Site": {"@SiteCode": "KC1", "@SiteName": "Kensington",
            "@Latitude": 51.521, "@Longitude": -0.213, "Species": {"@SpeciesCode": "O3"}}}}"#;

        let sites = SiteCatalogReader::new().parse_sites(json).unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].coordinates(), Some((51.521, -0.213)));
    }

    #[test]
    fn test_bad_coordinate_is_an_error() {
        let json = r#"{"Sites": {"Site": [{"@SiteCode": "KC1", "@SiteName": "x",
            "@Latitude": "north", "@Longitude": "-0.2"}]}}"#;

        let result = SiteCatalogReader::new().parse_sites(json);
        assert!(matches!(result, Err(ProcessingError::InvalidCoordinate(_))));

        let off_globe = r#"{"Sites": {"Site": [{"@SiteCode": "KC1", "@SiteName": "x",
            "@Latitude": "95.0", "@Longitude": "-0.2"}]}}"#;
        let result = SiteCatalogReader::new().parse_sites(off_globe);
        assert!(matches!(result, Err(ProcessingError::InvalidCoordinate(_))));
    }

    #[test]
    fn test_read_catalog_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "{}", CATALOG)?;

        let catalog = SiteCatalogReader::new().read_catalog(temp_file.path())?;
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.site("BX0").unwrap().name, "Bexley - Belvedere FDMS");

        Ok(())
    }
}
