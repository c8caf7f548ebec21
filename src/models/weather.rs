//! Weather snapshot model and display methods

use serde::{Deserialize, Serialize};

const ICON_BASE_URL: &str = "http://openweathermap.org/img/wn";

/// Current weather conditions at one point in time, metric units
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Relative humidity in percent
    pub humidity_pct: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Human-readable description of weather conditions
    pub description: String,
    /// Weather condition icon ID from API
    pub icon_code: String,
}

impl WeatherSnapshot {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", self.temperature_c)
    }

    /// Format weather description with every word capitalized
    #[must_use]
    pub fn format_description(&self) -> String {
        self.description
            .split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// URL of the 2x icon image for this condition
    #[must_use]
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}@2x.png", self.icon_code)
    }
}
