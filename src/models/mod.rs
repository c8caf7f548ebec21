//! Data models for `AirLog`
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates
//! - Weather: Current weather snapshot
//! - Air quality: Current pollutant snapshot and AQI classification
//! - Record: The flat, timestamped unit persisted to the ledger

pub mod air_quality;
pub mod location;
pub mod record;
pub mod weather;

// Re-export all public types for convenient access
pub use air_quality::{AirQualitySnapshot, AqiCategory, classify};
pub use location::Coordinates;
pub use record::{Record, RecordBuilder, TIMESTAMP_FORMAT};
pub use weather::WeatherSnapshot;
