//! Location name to coordinates via the direct geocoding endpoint

use crate::AirLogError;
use crate::Result;
use crate::error::Endpoint;
use crate::models::Coordinates;
use super::ApiClient;
use super::openweather::GeocodingCandidate;
use tracing::{debug, info, instrument, warn};

const GEOCODING_PATH: &str = "/geo/1.0/direct";

/// Resolves free-text location names to coordinates
#[derive(Debug, Clone)]
pub struct Geocoder {
    api: ApiClient,
}

impl Geocoder {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Resolve a location name, taking the service's top-ranked candidate.
    ///
    /// Fails with `NotFound` when the service answers with no candidates and
    /// with `InvalidInput` for a blank name, before any request is made.
    #[instrument(skip(self), fields(location = location_name))]
    pub fn resolve(&self, location_name: &str) -> Result<Coordinates> {
        let location_name = location_name.trim();
        if location_name.is_empty() {
            return Err(AirLogError::invalid_input("Please enter a city name."));
        }

        info!("Geocoding location: '{}'", location_name);

        let candidates: Vec<GeocodingCandidate> = self.api.get_json(
            Endpoint::Geocoding,
            GEOCODING_PATH,
            &[("q", location_name.to_string()), ("limit", "1".to_string())],
        )?;

        let Some(candidate) = candidates.into_iter().next() else {
            warn!("No results found for location '{}'", location_name);
            return Err(AirLogError::NotFound {
                location: location_name.to_string(),
            });
        };

        debug!(
            "Top candidate: {} ({}, {})",
            candidate.name.as_deref().unwrap_or("?"),
            candidate.state.as_deref().unwrap_or("-"),
            candidate.country.as_deref().unwrap_or("-")
        );

        let coordinates = Coordinates::try_from(candidate)?;
        info!(
            "Resolved '{}' to {}",
            location_name,
            coordinates.format_coordinates()
        );
        Ok(coordinates)
    }
}
