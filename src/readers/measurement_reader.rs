use chrono::{NaiveDate, NaiveDateTime};
use encoding_rs::{UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{ProcessingError, Result};
use crate::models::{MeasurementSeries, Pollutant};
use crate::utils::constants::{MISSING_VALUE_MARKERS, TIMESTAMP_COLUMN};
use crate::utils::filename::site_code_from_path;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Reads one site's wide measurement table (`<SITE>_data.csv`).
pub struct MeasurementReader {
    strict_values: bool,
}

impl MeasurementReader {
    pub fn new() -> Self {
        Self {
            strict_values: false,
        }
    }

    /// Reject unparseable cells instead of reading them as missing
    pub fn with_strict_values(strict_values: bool) -> Self {
        Self { strict_values }
    }

    /// Read a table, taking the site code from the file name
    pub fn read_series(&self, path: &Path) -> Result<MeasurementSeries> {
        let site_code = site_code_from_path(path).ok_or_else(|| {
            ProcessingError::InvalidFormat(format!(
                "Filename does not match <SITE>_data.csv: {}",
                path.display()
            ))
        })?;
        self.read_series_with_code(path, &site_code)
    }

    pub fn read_series_with_code(&self, path: &Path, site_code: &str) -> Result<MeasurementSeries> {
        let bytes = fs::read(path)?;
        let text = decode_text(&bytes);
        self.parse_series(site_code, &text)
    }

    pub fn parse_series(&self, site_code: &str, text: &str) -> Result<MeasurementSeries> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let time_index = headers
            .iter()
            .position(|h| h == TIMESTAMP_COLUMN)
            .ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "Site {} table has no '{}' column",
                    site_code, TIMESTAMP_COLUMN
                ))
            })?;

        // (csv index, normalized name); unnamed and duplicate columns are dropped
        let mut value_columns: Vec<(usize, String)> = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            if index == time_index || header.is_empty() {
                continue;
            }
            let name = normalize_column_name(header);
            if value_columns.iter().any(|(_, existing)| *existing == name) {
                warn!(site = site_code, column = %name, "duplicate column ignored");
                continue;
            }
            value_columns.push((index, name));
        }

        let mut timestamps = Vec::new();
        let mut cells: Vec<Vec<Option<f64>>> = vec![Vec::new(); value_columns.len()];
        let mut unreadable = 0usize;

        for record in reader.records() {
            let record = record?;
            let raw_time = record.get(time_index).unwrap_or("");
            if raw_time.is_empty() {
                continue;
            }
            timestamps.push(parse_timestamp(raw_time)?);

            for (slot, (index, name)) in value_columns.iter().enumerate() {
                let raw = record.get(*index).unwrap_or("");
                let value = match parse_cell(raw) {
                    Ok(value) => value,
                    Err(e) if self.strict_values => return Err(e),
                    Err(_) => {
                        unreadable += 1;
                        debug!(site = site_code, column = %name, cell = raw, "unreadable cell");
                        None
                    }
                };
                cells[slot].push(value);
            }
        }

        if unreadable > 0 {
            warn!(
                site = site_code,
                cells = unreadable,
                "unreadable cells treated as missing"
            );
        }

        let columns: BTreeMap<String, Vec<Option<f64>>> = value_columns
            .into_iter()
            .map(|(_, name)| name)
            .zip(cells)
            .collect();

        MeasurementSeries::from_columns(site_code, timestamps, columns)
    }
}

impl Default for MeasurementReader {
    fn default() -> Self {
        Self::new()
    }
}

/// UTF-8 (BOM stripped), falling back to Windows-1252 for legacy exports
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return text;
    }
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text
}

/// Strip a per-site prefix such as `"Marylebone Road: Ozone (ug/m3)"` when the
/// remainder is a known pollutant column.
pub fn normalize_column_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if Pollutant::from_column_name(trimmed).is_some() {
        return trimmed.to_string();
    }

    match trimmed.rsplit_once(": ") {
        Some((_, tail)) if Pollutant::from_column_name(tail.trim()).is_some() => {
            tail.trim().to_string()
        }
        _ => trimmed.to_string(),
    }
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    for format in DATETIME_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(timestamp);
        }
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")?;
    date.and_hms_opt(0, 0, 0).ok_or_else(|| {
        ProcessingError::InvalidFormat(format!("Invalid timestamp: '{}'", raw))
    })
}

fn parse_cell(raw: &str) -> Result<Option<f64>> {
    if MISSING_VALUE_MARKERS.contains(&raw) {
        return Ok(None);
    }

    let value = raw
        .parse::<f64>()
        .map_err(|_| ProcessingError::InvalidFormat(format!("Invalid measurement: '{}'", raw)))?;

    Ok(value.is_finite().then_some(value))
}
