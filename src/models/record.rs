//! The persisted ledger record and the builder that merges snapshots into it

use super::{AirQualitySnapshot, WeatherSnapshot};
use chrono::{NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

/// Format of the timestamp column, local time to second precision
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One merged weather + air-quality observation.
///
/// Field order is the ledger's column order; the serde names are its header.
/// The timestamp is stored to whole seconds, so build records through
/// `RecordBuilder` to have them compare equal after a ledger round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Timestamp", with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Temperature")]
    pub temperature_c: f64,
    #[serde(rename = "Humidity")]
    pub humidity_pct: f64,
    #[serde(rename = "Wind Speed")]
    pub wind_speed: f64,
    #[serde(rename = "AQI")]
    pub aqi: i32,
    #[serde(rename = "PM2.5")]
    pub pm2_5: f64,
    #[serde(rename = "PM10")]
    pub pm10: f64,
    #[serde(rename = "NO2")]
    pub no2: f64,
    #[serde(rename = "SO2")]
    pub so2: f64,
    #[serde(rename = "CO")]
    pub co: f64,
}

impl Record {
    /// Column names in ledger order
    pub const HEADER: [&'static str; 11] = [
        "Timestamp",
        "City",
        "Temperature",
        "Humidity",
        "Wind Speed",
        "AQI",
        "PM2.5",
        "PM10",
        "NO2",
        "SO2",
        "CO",
    ];

    /// Timestamp rendered the way the ledger stores it
    #[must_use]
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Merges complete snapshots into a `Record`
pub struct RecordBuilder;

impl RecordBuilder {
    /// Build a record stamped with `now`, truncated to whole seconds
    #[must_use]
    pub fn build(
        city: &str,
        weather: &WeatherSnapshot,
        air: &AirQualitySnapshot,
        now: NaiveDateTime,
    ) -> Record {
        Record {
            timestamp: now.trunc_subsecs(0),
            city: city.to_string(),
            temperature_c: weather.temperature_c,
            humidity_pct: weather.humidity_pct,
            wind_speed: weather.wind_speed,
            aqi: air.aqi,
            pm2_5: air.pm2_5,
            pm10: air.pm10,
            no2: air.no2,
            so2: air.so2,
            co: air.co,
        }
    }
}

mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
            .map_err(|e| de::Error::custom(format!("invalid timestamp '{raw}': {e}")))
    }
}
