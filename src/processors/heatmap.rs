use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::Result;
use crate::models::Pollutant;
use crate::processors::{BoundEstimate, FeatureBuilder, Placement, SiteBuckets};
use crate::utils::constants::{MAX_PLAYBACK_SPEED, MIN_PLAYBACK_SPEED, PLAYBACK_SPEED_STEP};

/// Heat-map-with-time input: one frame of `[lat, lon, level]` points per week
/// on a time axis shared by every site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapFrames {
    pub pollutant: Pollutant,
    pub index: Vec<NaiveDate>,
    pub frames: Vec<Vec<[f64; 3]>>,
    pub min_speed: u32,
    pub max_speed: u32,
    pub speed_step: u32,
}

impl HeatmapFrames {
    /// Frames over the union of all sites' weeks. Filtering and
    /// normalization match the feature layer.
    pub fn build(
        pollutant: Pollutant,
        sites: &[SiteBuckets<'_>],
        bounds: &BoundEstimate,
        builder: &FeatureBuilder,
    ) -> Result<Self> {
        builder.check_bounds(bounds)?;

        let index: Vec<NaiveDate> = sites
            .iter()
            .flat_map(|entry| entry.buckets.weeks())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut frames = Vec::with_capacity(index.len());
        for &week in &index {
            let mut frame = Vec::new();
            for entry in sites {
                let Some((latitude, longitude)) = entry.site.coordinates() else {
                    continue;
                };
                let Some(value) = entry.buckets.get(week) else {
                    continue;
                };
                if let Placement::Level(level) = builder.place(value, bounds)? {
                    frame.push([latitude, longitude, level]);
                }
            }
            frames.push(frame);
        }

        Ok(Self {
            pollutant,
            index,
            frames,
            min_speed: MIN_PLAYBACK_SPEED,
            max_speed: MAX_PLAYBACK_SPEED,
            speed_step: PLAYBACK_SPEED_STEP,
        })
    }

    pub fn point_count(&self) -> usize {
        self.frames.iter().map(Vec::len).sum()
    }
}
