use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ProcessingError, Result};

/// Monitored pollutant species supported by the time map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pollutant {
    #[serde(rename = "NO2")]
    NitrogenDioxide,
    #[serde(rename = "O3")]
    Ozone,
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "SO2")]
    SulphurDioxide,
    #[serde(rename = "PM25")]
    Pm25,
    #[serde(rename = "CO")]
    CarbonMonoxide,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::NitrogenDioxide,
        Pollutant::Ozone,
        Pollutant::Pm10,
        Pollutant::SulphurDioxide,
        Pollutant::Pm25,
        Pollutant::CarbonMonoxide,
    ];

    pub fn from_code(code: &str) -> Result<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "NO2" => Ok(Pollutant::NitrogenDioxide),
            "O3" => Ok(Pollutant::Ozone),
            "PM10" => Ok(Pollutant::Pm10),
            "SO2" => Ok(Pollutant::SulphurDioxide),
            "PM25" => Ok(Pollutant::Pm25),
            "CO" => Ok(Pollutant::CarbonMonoxide),
            _ => Err(ProcessingError::UnknownPollutantCode(code.to_string())),
        }
    }

    /// Species code as used by the site catalog
    pub fn code(&self) -> &'static str {
        match self {
            Pollutant::NitrogenDioxide => "NO2",
            Pollutant::Ozone => "O3",
            Pollutant::Pm10 => "PM10",
            Pollutant::SulphurDioxide => "SO2",
            Pollutant::Pm25 => "PM25",
            Pollutant::CarbonMonoxide => "CO",
        }
    }

    /// Column header carrying this species in a measurement table
    pub fn column_name(&self) -> &'static str {
        match self {
            Pollutant::NitrogenDioxide => "Nitrogen Dioxide (ug/m3)",
            Pollutant::Ozone => "Ozone (ug/m3)",
            Pollutant::Pm10 => "PM10 Particulate (ug/m3)",
            Pollutant::SulphurDioxide => "Sulphur Dioxide (ug/m3)",
            Pollutant::Pm25 => "PM2.5 Particulate (ug/m3)",
            Pollutant::CarbonMonoxide => "Carbon Monoxide (mg/m3)",
        }
    }

    pub fn from_column_name(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.column_name() == column)
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Pollutant {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s)
    }
}

/// Species a site declares it monitors. The catalog lists either a single
/// species object or an array of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollutantCapability {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl PollutantCapability {
    pub fn supports(&self, pollutant: Pollutant) -> bool {
        self.codes().any(|code| code == pollutant.code())
    }

    pub fn codes(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            PollutantCapability::None => Box::new(std::iter::empty()),
            PollutantCapability::Single(code) => Box::new(std::iter::once(code.as_str())),
            PollutantCapability::Multiple(codes) => Box::new(codes.iter().map(String::as_str)),
        }
    }
}
