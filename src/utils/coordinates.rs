use crate::error::{ProcessingError, Result};
use crate::utils::constants::{MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE};

/// Parse a decimal-degree coordinate where an empty field means "unknown".
///
/// # Examples
/// ```
/// use aq_timemap::utils::coordinates::parse_optional_coordinate;
///
/// assert_eq!(parse_optional_coordinate(" 51.52254 ").unwrap(), Some(51.52254));
/// assert_eq!(parse_optional_coordinate("").unwrap(), None);
/// ```
pub fn parse_optional_coordinate(coord_str: &str) -> Result<Option<f64>> {
    let trimmed = coord_str.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value = trimmed.parse::<f64>().map_err(|_| {
        ProcessingError::InvalidCoordinate(format!("Invalid coordinate value: '{}'", coord_str))
    })?;

    if !value.is_finite() {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Coordinate is not a finite number: '{}'",
            coord_str
        )));
    }

    Ok(Some(value))
}

/// Check that a latitude/longitude pair lies on the globe
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Latitude {} is outside [{}, {}]",
            latitude, MIN_LATITUDE, MAX_LATITUDE
        )));
    }

    if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Longitude {} is outside [{}, {}]",
            longitude, MIN_LONGITUDE, MAX_LONGITUDE
        )));
    }

    Ok(())
}
