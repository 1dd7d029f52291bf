use crate::models::{CollectionType, Feature, PlaybackOptions, Pollutant, TimedFeatureCollection};
use crate::utils::constants::LAYER_NAME_PREFIX;

/// Packages built features with the time-slider playback settings.
pub struct CollectionAssembler {
    playback: PlaybackOptions,
}

impl CollectionAssembler {
    pub fn new() -> Self {
        Self {
            playback: PlaybackOptions::default(),
        }
    }

    pub fn with_playback(playback: PlaybackOptions) -> Self {
        Self { playback }
    }

    /// Pure packaging: features are kept exactly as given
    pub fn assemble(&self, pollutant: Pollutant, features: Vec<Feature>) -> TimedFeatureCollection {
        TimedFeatureCollection {
            kind: CollectionType::FeatureCollection,
            name: format!("{} {}", LAYER_NAME_PREFIX, pollutant.code()),
            pollutant,
            features,
            playback: self.playback.clone(),
        }
    }
}

impl Default for CollectionAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_assemble_keeps_features_and_fixed_playback() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let features = vec![
            Feature::new(51.5, -0.1, date, "#0d0887", "B".to_string()),
            Feature::new(51.4, -0.2, date, "#f0f921", "A".to_string()),
        ];

        let collection = CollectionAssembler::new().assemble(Pollutant::Pm10, features.clone());

        assert_eq!(collection.features, features);
        assert_eq!(collection.name, "Time Map for PM10");
        assert_eq!(collection.playback.period, "P1W");
        assert!(!collection.playback.auto_play);
        assert!(!collection.playback.loop_playback);
        assert_eq!(collection.playback.min_speed, 5);
        assert_eq!(collection.playback.max_speed, 50);
        assert_eq!(collection.playback.date_options, "YYYY-MM-DD");
        assert_eq!(collection.date_range(), Some((date, date)));
    }
}
