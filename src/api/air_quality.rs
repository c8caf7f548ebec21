//! Current air pollution for a pair of coordinates

use crate::Result;
use crate::error::Endpoint;
use crate::models::{AirQualitySnapshot, Coordinates};
use super::ApiClient;
use super::openweather::AirPollutionResponse;
use tracing::{info, instrument};

const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";

/// Fetches the most current pollutant reading
#[derive(Debug, Clone)]
pub struct AirQualityClient {
    api: ApiClient,
}

impl AirQualityClient {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    pub fn fetch(&self, coordinates: Coordinates) -> Result<AirQualitySnapshot> {
        info!(
            "Getting air quality for coordinates: {}",
            coordinates.format_coordinates()
        );

        let response: AirPollutionResponse = self.api.get_json(
            Endpoint::AirQuality,
            AIR_POLLUTION_PATH,
            &[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
            ],
        )?;

        let snapshot = AirQualitySnapshot::try_from(response)?;
        info!("Air quality index: {} ({})", snapshot.aqi, snapshot.category());
        Ok(snapshot)
    }
}
