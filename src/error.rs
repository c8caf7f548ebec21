//! Error types and handling for the `AirLog` service layer

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Remote endpoint an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Geocoding,
    Weather,
    AirQuality,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::Geocoding => "geocoding",
            Endpoint::Weather => "weather",
            Endpoint::AirQuality => "air quality",
        };
        f.write_str(name)
    }
}

/// Main error type for the `AirLog` application
#[derive(Error, Debug)]
pub enum AirLogError {
    /// The geocoder returned no candidates for the name
    #[error("Location not found: {location}")]
    NotFound { location: String },

    /// A remote call answered with a non-success status
    #[error("{endpoint} API error: HTTP {status}")]
    Service { endpoint: Endpoint, status: u16 },

    /// A successful call whose body lacks an expected field
    #[error("Malformed {endpoint} response: {detail}")]
    MalformedResponse { endpoint: Endpoint, detail: String },

    /// The request never produced a response
    #[error("Network error calling {endpoint} API: {source}")]
    Network {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    /// A persisted row violates the ledger schema
    #[error("Corrupt ledger at line {line}: {reason}")]
    CorruptLedger { line: u64, reason: String },

    /// Read attempted before the first append
    #[error("Ledger not found: {}", path.display())]
    LedgerNotFound { path: PathBuf },

    /// The ledger exists but holds no data rows
    #[error("Ledger has no records: {}", path.display())]
    LedgerEmpty { path: PathBuf },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AirLogError {
    /// Create a malformed-response error for a missing field
    pub fn missing_field<S: AsRef<str>>(endpoint: Endpoint, field: S) -> Self {
        Self::MalformedResponse {
            endpoint,
            detail: format!("missing field `{}`", field.as_ref()),
        }
    }

    /// Create a malformed-response error with a free-form detail
    pub fn malformed<S: Into<String>>(endpoint: Endpoint, detail: S) -> Self {
        Self::MalformedResponse {
            endpoint,
            detail: detail.into(),
        }
    }

    /// Create a corrupt-ledger error
    pub fn corrupt<S: Into<String>>(line: u64, reason: S) -> Self {
        Self::CorruptLedger {
            line,
            reason: reason.into(),
        }
    }

    /// Create a new input validation error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status of a service failure, if this is one
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AirLogError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AirLogError::NotFound { location } => format!("City {location} not found"),
            AirLogError::Service { endpoint, status } => match (endpoint, status) {
                (_, 401) => {
                    "The API key was rejected. Please check your configuration.".to_string()
                }
                (Endpoint::Geocoding, _) => format!("Geocoding API error: {status}"),
                (Endpoint::Weather, _) => format!("Weather API error: {status}"),
                (Endpoint::AirQuality, _) => format!("Air Quality API error: {status}"),
            },
            AirLogError::MalformedResponse { endpoint, .. } => {
                format!("The {endpoint} service returned data in an unexpected format.")
            }
            AirLogError::Network { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            AirLogError::CorruptLedger { line, .. } => {
                format!("The data log is damaged at line {line}. Please inspect the file.")
            }
            AirLogError::LedgerNotFound { .. } | AirLogError::LedgerEmpty { .. } => {
                "No data collected yet. Fetch a city first.".to_string()
            }
            AirLogError::InvalidInput { message } => message.clone(),
            AirLogError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            AirLogError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
