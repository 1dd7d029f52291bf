use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

use crate::models::Pollutant;
use crate::utils::constants::{DEFAULT_OUTPUT_DIR, SITE_DATA_SUFFIX};

/// Generate default output directory with format: output/timemap-{YYMMDD}
pub fn generate_default_output_dir() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let dirname = format!("timemap-{:02}{:02}{:02}", year, month, day);
    PathBuf::from(DEFAULT_OUTPUT_DIR).join(dirname)
}

pub fn collection_path(output_dir: &Path, pollutant: Pollutant) -> PathBuf {
    output_dir.join(format!("timemap_{}.json", pollutant.code()))
}

pub fn site_layer_path(output_dir: &Path, pollutant: Pollutant) -> PathBuf {
    output_dir.join(format!("sites_{}.json", pollutant.code()))
}

pub fn heatmap_path(output_dir: &Path, pollutant: Pollutant) -> PathBuf {
    output_dir.join(format!("heatmap_{}.json", pollutant.code()))
}

/// Site code of a per-site measurement file (`MY1_data.csv` -> `MY1`)
pub fn site_code_from_path(path: &Path) -> Option<String> {
    let filename = path.file_name()?.to_str()?;
    if !filename.ends_with(SITE_DATA_SUFFIX) {
        return None;
    }

    let code = filename.split('_').next()?;
    if code.is_empty() {
        None
    } else {
        Some(code.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_output_dir() {
        let dir = generate_default_output_dir();
        let dir_str = dir.to_string_lossy();

        assert!(dir_str.starts_with("output/"));
        assert!(dir_str.contains("timemap-"));
        assert_eq!(dir.file_name().unwrap().to_string_lossy().len(), "timemap-YYMMDD".len());
    }

    #[test]
    fn test_output_paths() {
        let dir = Path::new("out");
        assert_eq!(
            collection_path(dir, Pollutant::Pm25),
            PathBuf::from("out/timemap_PM25.json")
        );
        assert_eq!(
            site_layer_path(dir, Pollutant::NitrogenDioxide),
            PathBuf::from("out/sites_NO2.json")
        );
        assert_eq!(
            heatmap_path(dir, Pollutant::Ozone),
            PathBuf::from("out/heatmap_O3.json")
        );
    }

    #[test]
    fn test_site_code_from_path() {
        assert_eq!(
            site_code_from_path(Path::new("data/MY1_data.csv")),
            Some("MY1".to_string())
        );
        assert_eq!(site_code_from_path(Path::new("data/notes.txt")), None);
        assert_eq!(site_code_from_path(Path::new("data/_data.csv")), None);
    }
}
