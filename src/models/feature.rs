//! GeoJSON-shaped output records consumed by the time-slider map layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Pollutant;
use crate::utils::constants::{
    DATE_DISPLAY_FORMAT, FEATURE_FILL_OPACITY, FEATURE_ICON, FEATURE_RADIUS, FEATURE_WEIGHT,
    MAX_PLAYBACK_SPEED, MIN_PLAYBACK_SPEED, PLAYBACK_PERIOD, PLAYBACK_SPEED_STEP,
    SITE_MARKER_COLOR, SITE_MARKER_FILL_OPACITY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionType {
    FeatureCollection,
}

/// GeoJSON point. Coordinates are `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: GeometryType,
    pub coordinates: [f64; 2],
}

impl PointGeometry {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            kind: GeometryType::Point,
            coordinates: [longitude, latitude],
        }
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconStyle {
    pub fill_color: String,
    pub fill_opacity: f64,
    pub color: String,
    pub weight: u32,
    pub stroke: bool,
    pub fill: bool,
    pub radius: u32,
}

impl IconStyle {
    pub fn circle(color: &str) -> Self {
        Self {
            fill_color: color.to_string(),
            fill_opacity: FEATURE_FILL_OPACITY,
            color: color.to_string(),
            weight: FEATURE_WEIGHT,
            stroke: false,
            fill: true,
            radius: FEATURE_RADIUS,
        }
    }

    pub fn site_marker() -> Self {
        Self {
            fill_opacity: SITE_MARKER_FILL_OPACITY,
            ..Self::circle(SITE_MARKER_COLOR)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub time: NaiveDate,
    pub icon: String,
    pub popup: String,
    #[serde(rename = "iconstyle")]
    pub style: IconStyle,
}

/// One site's weekly value, placed on the map and coloured by level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub geometry: PointGeometry,
    pub properties: FeatureProperties,
}

impl Feature {
    pub fn new(latitude: f64, longitude: f64, date: NaiveDate, color: &str, popup: String) -> Self {
        Self {
            kind: FeatureType::Feature,
            geometry: PointGeometry::new(latitude, longitude),
            properties: FeatureProperties {
                time: date,
                icon: FEATURE_ICON.to_string(),
                popup,
                style: IconStyle::circle(color),
            },
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.properties.time
    }

    pub fn color(&self) -> &str {
        &self.properties.style.fill_color
    }

    pub fn popup(&self) -> &str {
        &self.properties.popup
    }
}

/// Slider and animation settings understood by the time-dimension control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackOptions {
    pub period: String,
    pub add_last_point: bool,
    pub auto_play: bool,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
    pub loop_button: bool,
    pub min_speed: u32,
    pub max_speed: u32,
    pub speed_step: u32,
    pub date_options: String,
    pub time_slider_drag_update: bool,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            period: PLAYBACK_PERIOD.to_string(),
            add_last_point: true,
            auto_play: false,
            loop_playback: false,
            loop_button: true,
            min_speed: MIN_PLAYBACK_SPEED,
            max_speed: MAX_PLAYBACK_SPEED,
            speed_step: PLAYBACK_SPEED_STEP,
            date_options: DATE_DISPLAY_FORMAT.to_string(),
            time_slider_drag_update: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedFeatureCollection {
    #[serde(rename = "type")]
    pub kind: CollectionType,
    pub name: String,
    pub pollutant: Pollutant,
    pub features: Vec<Feature>,
    #[serde(flatten)]
    pub playback: PlaybackOptions,
}

impl TimedFeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.features.iter().map(Feature::date).min()?;
        let last = self.features.iter().map(Feature::date).max()?;
        Some((first, last))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerProperties {
    pub popup: String,
    #[serde(rename = "iconstyle")]
    pub style: IconStyle,
}

/// Untimed grey marker for a site that contributes to a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteMarker {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub geometry: PointGeometry,
    pub properties: MarkerProperties,
}

impl SiteMarker {
    pub fn new(latitude: f64, longitude: f64, popup: String) -> Self {
        Self {
            kind: FeatureType::Feature,
            geometry: PointGeometry::new(latitude, longitude),
            properties: MarkerProperties {
                popup,
                style: IconStyle::site_marker(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteLocationCollection {
    #[serde(rename = "type")]
    pub kind: CollectionType,
    pub name: String,
    pub features: Vec<SiteMarker>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feature_geojson_shape() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let feature = Feature::new(51.5, -0.12, date, "#0d0887", "Site<br />1.00 x".to_string());

        let value = serde_json::to_value(&feature).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-0.12, 51.5]},
                "properties": {
                    "time": "2021-03-01",
                    "icon": "circle",
                    "popup": "Site<br />1.00 x",
                    "iconstyle": {
                        "fillColor": "#0d0887",
                        "fillOpacity": 0.8,
                        "color": "#0d0887",
                        "weight": 1,
                        "stroke": false,
                        "fill": true,
                        "radius": 10
                    }
                }
            })
        );
    }

    #[test]
    fn test_playback_defaults_serialize_flat() {
        let collection = TimedFeatureCollection {
            kind: CollectionType::FeatureCollection,
            name: "Time Map for NO2".to_string(),
            pollutant: Pollutant::NitrogenDioxide,
            features: Vec::new(),
            playback: PlaybackOptions::default(),
        };

        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["pollutant"], "NO2");
        assert_eq!(value["period"], "P1W");
        assert_eq!(value["auto_play"], false);
        assert_eq!(value["loop"], false);
        assert_eq!(value["min_speed"], 5);
        assert_eq!(value["max_speed"], 50);
        assert_eq!(value["date_options"], "YYYY-MM-DD");
        assert!(collection.date_range().is_none());
    }

    #[test]
    fn test_site_marker_style() {
        let marker = SiteMarker::new(51.5, -0.12, "Site".to_string());
        assert_eq!(marker.properties.style.fill_color, "#9c9a95");
        assert_eq!(marker.properties.style.fill_opacity, 0.4);
        assert_eq!(marker.geometry.latitude(), 51.5);
        assert_eq!(marker.geometry.longitude(), -0.12);
    }
}
