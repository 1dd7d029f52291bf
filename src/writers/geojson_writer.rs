use chrono::NaiveDate;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::models::{Feature, Pollutant, SiteLocationCollection, TimedFeatureCollection};
use crate::processors::HeatmapFrames;

/// Rendering sink: serializes map layers as JSON documents.
pub struct GeoJsonWriter {
    pretty: bool,
}

impl GeoJsonWriter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Write the timed collection. Output is byte-identical for equal input.
    pub fn write_collection(&self, collection: &TimedFeatureCollection, path: &Path) -> Result<()> {
        self.write_json(collection, path)
    }

    pub fn write_site_layer(&self, layer: &SiteLocationCollection, path: &Path) -> Result<()> {
        self.write_json(layer, path)
    }

    pub fn write_heatmap(&self, heatmap: &HeatmapFrames, path: &Path) -> Result<()> {
        self.write_json(heatmap, path)
    }

    pub fn to_json(&self, collection: &TimedFeatureCollection) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(collection)?
        } else {
            serde_json::to_string(collection)?
        };
        Ok(json)
    }

    pub fn read_collection(&self, path: &Path) -> Result<TimedFeatureCollection> {
        let file = File::open(path)?;
        let collection = serde_json::from_reader(BufReader::new(file))?;
        Ok(collection)
    }

    /// First `limit` features of a written collection
    pub fn read_sample_features(&self, path: &Path, limit: usize) -> Result<Vec<Feature>> {
        let collection = self.read_collection(path)?;
        Ok(collection.features.into_iter().take(limit).collect())
    }

    pub fn get_file_info(&self, path: &Path) -> Result<CollectionFileInfo> {
        let collection = self.read_collection(path)?;
        let file_size = fs::metadata(path)?.len();

        Ok(CollectionFileInfo {
            name: collection.name.clone(),
            pollutant: collection.pollutant,
            feature_count: collection.len(),
            date_range: collection.date_range(),
            file_size,
        })
    }

    fn write_json<T: Serialize>(&self, value: &T, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, value)?;
        } else {
            serde_json::to_writer(&mut writer, value)?;
        }
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(())
    }
}

impl Default for GeoJsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionFileInfo {
    pub name: String,
    pub pollutant: Pollutant,
    pub feature_count: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub file_size: u64,
}

impl CollectionFileInfo {
    pub fn summary(&self) -> String {
        let dates = match self.date_range {
            Some((first, last)) => format!("{} to {}", first, last),
            None => "none".to_string(),
        };

        format!(
            "Time Map File Summary:\n\
            - Layer: {}\n\
            - Pollutant: {} ({})\n\
            - Features: {}\n\
            - Weeks: {}\n\
            - File size: {:.2} KB",
            self.name,
            self.pollutant,
            self.pollutant.column_name(),
            self.feature_count,
            dates,
            self.file_size as f64 / 1024.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::CollectionAssembler;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_collection() -> TimedFeatureCollection {
        let week = |d: u32| NaiveDate::from_ymd_opt(2022, 8, d).unwrap();
        let features = vec![
            Feature::new(51.52, -0.15, week(1), "#0d0887", "Marylebone<br />40.00 x".into()),
            Feature::new(51.52, -0.15, week(8), "#f0f921", "Marylebone<br />60.00 x".into()),
        ];
        CollectionAssembler::new().assemble(Pollutant::SulphurDioxide, features)
    }

    #[test]
    fn test_write_and_read_back() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested").join("timemap_SO2.json");
        let writer = GeoJsonWriter::new();
        let collection = sample_collection();

        writer.write_collection(&collection, &path)?;
        assert_eq!(writer.read_collection(&path)?, collection);

        let info = writer.get_file_info(&path)?;
        assert_eq!(info.feature_count, 2);
        assert_eq!(info.pollutant, Pollutant::SulphurDioxide);
        assert!(info.summary().contains("2022-08-01 to 2022-08-08"));

        assert_eq!(writer.read_sample_features(&path, 1)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_output_is_deterministic() -> Result<()> {
        let dir = TempDir::new()?;
        let first = dir.path().join("a.json");
        let second = dir.path().join("b.json");
        let writer = GeoJsonWriter::new().with_pretty(true);

        writer.write_collection(&sample_collection(), &first)?;
        writer.write_collection(&sample_collection(), &second)?;

        assert_eq!(fs::read(&first)?, fs::read(&second)?);
        Ok(())
    }

    #[test]
    fn test_document_shape() -> Result<()> {
        let json = GeoJsonWriter::new().to_json(&sample_collection())?;
        let value: serde_json::Value = serde_json::from_str(&json)?;

        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["period"], "P1W");
        assert_eq!(value["loop"], false);
        assert_eq!(value["features"][0]["geometry"]["coordinates"][0], -0.15);
        assert_eq!(value["features"][0]["properties"]["time"], "2022-08-01");
        assert_eq!(value["features"][0]["properties"]["iconstyle"]["fillColor"], "#0d0887");
        Ok(())
    }
}
