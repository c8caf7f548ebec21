//! One acquisition cycle: geocode, fetch, merge, persist
//!
//! Calls are made in sequence and any failure aborts the cycle before a
//! record is built, so the ledger never sees partial data.

use crate::Result;
use crate::api::{AirQualityClient, ApiClient, Geocoder, WeatherClient};
use crate::config::AirLogConfig;
use crate::ledger::Ledger;
use crate::models::{AirQualitySnapshot, Coordinates, Record, RecordBuilder, WeatherSnapshot};
use chrono::{Local, NaiveDateTime};
use tracing::{info, instrument};

/// Everything one successful cycle produced, for presentation
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub coordinates: Coordinates,
    pub weather: WeatherSnapshot,
    pub air_quality: AirQualitySnapshot,
    pub record: Record,
}

/// Service layer wiring the clients to the ledger
#[derive(Debug, Clone)]
pub struct AcquisitionService {
    geocoder: Geocoder,
    weather: WeatherClient,
    air_quality: AirQualityClient,
    ledger: Ledger,
}

impl AcquisitionService {
    #[must_use]
    pub fn new(
        geocoder: Geocoder,
        weather: WeatherClient,
        air_quality: AirQualityClient,
        ledger: Ledger,
    ) -> Self {
        Self {
            geocoder,
            weather,
            air_quality,
            ledger,
        }
    }

    /// Build all components from configuration
    pub fn from_config(config: &AirLogConfig) -> Result<Self> {
        let api = ApiClient::new(&config.api)?;
        Ok(Self::new(
            Geocoder::new(api.clone()),
            WeatherClient::new(api.clone()),
            AirQualityClient::new(api),
            Ledger::new(config.ledger.path.clone()),
        ))
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Run one cycle stamped with the current local time
    pub fn acquire(&self, city: &str) -> Result<Acquisition> {
        self.acquire_at(city, Local::now().naive_local())
    }

    /// Run one cycle stamped with `now`
    #[instrument(skip(self, now), fields(city = city))]
    pub fn acquire_at(&self, city: &str, now: NaiveDateTime) -> Result<Acquisition> {
        let city = city.trim();
        let coordinates = self.geocoder.resolve(city)?;
        let weather = self.weather.fetch(coordinates)?;
        let air_quality = self.air_quality.fetch(coordinates)?;

        let record = RecordBuilder::build(city, &weather, &air_quality, now);
        self.ledger.append(&record)?;

        info!(
            "Recorded {} ({}): {}, AQI {} ({})",
            city,
            coordinates.format_coordinates(),
            weather.format_temperature(),
            air_quality.aqi,
            air_quality.category()
        );

        Ok(Acquisition {
            coordinates,
            weather,
            air_quality,
            record,
        })
    }
}
