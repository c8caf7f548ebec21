//! Current weather for a pair of coordinates

use crate::Result;
use crate::error::Endpoint;
use crate::models::{Coordinates, WeatherSnapshot};
use super::ApiClient;
use super::openweather::WeatherResponse;
use tracing::{info, instrument};

const WEATHER_PATH: &str = "/data/2.5/weather";

/// Fetches current conditions in metric units
#[derive(Debug, Clone)]
pub struct WeatherClient {
    api: ApiClient,
}

impl WeatherClient {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the current weather snapshot.
    ///
    /// Units are always requested as metric: Celsius and m/s.
    #[instrument(skip(self), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    pub fn fetch(&self, coordinates: Coordinates) -> Result<WeatherSnapshot> {
        info!(
            "Getting current weather for coordinates: {}",
            coordinates.format_coordinates()
        );

        let response: WeatherResponse = self.api.get_json(
            Endpoint::Weather,
            WEATHER_PATH,
            &[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("units", "metric".to_string()),
            ],
        )?;

        let snapshot = WeatherSnapshot::try_from(response)?;
        info!(
            "Current weather: {}, {}",
            snapshot.format_temperature(),
            snapshot.description
        );
        Ok(snapshot)
    }
}
