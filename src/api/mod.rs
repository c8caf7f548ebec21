//! OpenWeatherMap API clients
//!
//! This module provides the blocking HTTP plumbing shared by the geocoding,
//! weather and air-quality clients. Every request carries the configured
//! credential; non-success statuses become `AirLogError::Service` and
//! undecodable bodies become `AirLogError::MalformedResponse`.

pub mod air_quality;
pub mod geocoder;
pub mod openweather;
pub mod weather;

pub use air_quality::AirQualityClient;
pub use geocoder::Geocoder;
pub use weather::WeatherClient;

use crate::AirLogError;
use crate::Result;
use crate::config::ApiConfig;
use crate::error::Endpoint;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Shared HTTP client carrying the base URL and credential
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    /// Create a new API client from configuration.
    ///
    /// Fails with `AirLogError::Config` if no API key is configured.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("AirLog/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AirLogError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Build the request URL; the credential is always the last parameter
    fn build_url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}{}?", self.base_url, path);
        for (name, value) in params {
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
            url.push('&');
        }
        url.push_str("appid=");
        url.push_str(&urlencoding::encode(&self.api_key));
        url
    }

    /// Issue one GET request and decode a successful JSON body
    #[instrument(skip(self, params), fields(endpoint = %endpoint, path = path))]
    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = self.build_url(path, params);
        debug!(
            "{} API request URL: {}appid=<redacted>",
            endpoint,
            url.split("appid=").next().unwrap_or(path)
        );

        let start_time = Instant::now();
        let response = self.client.get(&url).send().map_err(|source| {
            error!("Network error calling {} API: {}", endpoint, source);
            AirLogError::Network { endpoint, source }
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                "{} API request failed with status: {} - {}",
                endpoint,
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            );
            return Err(AirLogError::Service {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .map_err(|source| AirLogError::Network { endpoint, source })?;

        let total_duration = start_time.elapsed();
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow {} API response detected: {:.3}s",
                endpoint,
                total_duration.as_secs_f64()
            );
        } else {
            info!(
                "{} API responded in {:.3}s",
                endpoint,
                total_duration.as_secs_f64()
            );
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse {} response: {}", endpoint, e);
            AirLogError::malformed(endpoint, e.to_string())
        })
    }
}
