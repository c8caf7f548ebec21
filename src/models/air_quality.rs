//! Air-quality snapshot model and AQI classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Current pollutant readings at one point in time
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AirQualitySnapshot {
    /// Air Quality Index, 1 (good) to 5 (very poor)
    pub aqi: i32,
    /// Fine particulate matter in µg/m³
    pub pm2_5: f64,
    /// Coarse particulate matter in µg/m³
    pub pm10: f64,
    /// Nitrogen dioxide in µg/m³
    pub no2: f64,
    /// Sulphur dioxide in µg/m³
    pub so2: f64,
    /// Carbon monoxide in µg/m³
    pub co: f64,
}

impl AirQualitySnapshot {
    /// Category of this reading's AQI
    #[must_use]
    pub fn category(&self) -> AqiCategory {
        classify(self.aqi)
    }

    /// Multi-line pollutant breakdown
    #[must_use]
    pub fn format_pollutants(&self) -> String {
        format!(
            "PM2.5: {} µg/m3\nPM10: {} µg/m3\nNO2: {} µg/m3\nSO2: {} µg/m3\nCO: {} µg/m3",
            self.pm2_5, self.pm10, self.no2, self.so2, self.co
        )
    }
}

/// Severity band of an AQI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    Hazardous,
}

impl AqiCategory {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitive => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map an AQI value to its category.
///
/// Total over all integers: anything outside 1..=4 is `Hazardous`.
#[must_use]
pub fn classify(aqi: i32) -> AqiCategory {
    match aqi {
        1 => AqiCategory::Good,
        2 => AqiCategory::Moderate,
        3 => AqiCategory::UnhealthyForSensitive,
        4 => AqiCategory::Unhealthy,
        _ => AqiCategory::Hazardous,
    }
}
