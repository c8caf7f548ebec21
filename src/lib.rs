//! `AirLog` - weather and air-quality logging with retrospective analysis
//!
//! This library resolves a location name, fetches current weather and air
//! quality, appends the merged record to a CSV ledger, and analyzes the
//! accumulated ledger for trends and correlations.

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod pipeline;

// Re-export core types for public API
pub use analysis::{AnalysisResult, Analyzer, CorrelationMatrix, Metric, TrendPoint};
pub use api::{AirQualityClient, ApiClient, Geocoder, WeatherClient};
pub use config::AirLogConfig;
pub use error::{AirLogError, Endpoint};
pub use ledger::Ledger;
pub use models::{
    AirQualitySnapshot, AqiCategory, Coordinates, Record, RecordBuilder, WeatherSnapshot, classify,
};
pub use pipeline::{Acquisition, AcquisitionService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AirLogError>;
