//! Configuration management for `AirLog`
//!
//! Handles loading configuration from files and environment variables
//! and provides validation for all configuration settings. Every component
//! receives its settings from here at construction time.

use crate::AirLogError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `AirLog`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirLogConfig {
    /// Remote API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Ledger storage configuration
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote API settings shared by the geocoding, weather and air-quality clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// OpenWeatherMap API key
    pub key: Option<String>,
    /// Base URL all endpoints are resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Ledger file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Path of the CSV ledger
    #[serde(default = "default_ledger_path")]
    pub path: PathBuf,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("weather_air_quality.csv")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: default_ledger_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AirLogConfig {
    /// Load configuration from the default file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // AIRLOG_API__KEY -> api.key
        builder = builder.add_source(
            Environment::with_prefix("AIRLOG")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AirLogConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("airlog").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.api.base_url.is_empty() {
            self.api.base_url = default_base_url();
        }
        if self.api.timeout_seconds == 0 {
            self.api.timeout_seconds = default_timeout();
        }
        if self.ledger.path.as_os_str().is_empty() {
            self.ledger.path = default_ledger_path();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        if let Some(key) = &self.api.key {
            if key.trim().is_empty() {
                return Err(AirLogError::config(
                    "API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        if self.api.timeout_seconds > 300 {
            return Err(AirLogError::config("API timeout cannot exceed 300 seconds").into());
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AirLogError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "compact"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AirLogError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(
                AirLogError::config("API base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        Ok(())
    }
}

impl ApiConfig {
    /// The API key, required before any remote call is made
    pub fn require_api_key(&self) -> crate::Result<&str> {
        self.key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AirLogError::config(
                    "Missing API key. Set AIRLOG_API__KEY or api.key in config.toml",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AirLogConfig::default();
        assert_eq!(config.api.base_url, "https://api.openweathermap.org");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.ledger.path, PathBuf::from("weather_air_quality.csv"));
        assert_eq!(config.logging.level, "info");
        assert!(config.api.key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_require_api_key() {
        let mut config = AirLogConfig::default();
        assert!(matches!(
            config.api.require_api_key(),
            Err(AirLogError::Config { .. })
        ));

        config.api.key = Some("   ".to_string());
        assert!(config.api.require_api_key().is_err());

        config.api.key = Some(" abc123 ".to_string());
        assert_eq!(config.api.require_api_key().unwrap(), "abc123");
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let mut config = AirLogConfig::default();
        config.api.key = Some("   ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AirLogConfig::default();
        config.logging.level = "loud".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_timeout() {
        let mut config = AirLogConfig::default();
        config.api.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = AirLogConfig::default();
        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults() {
        let mut config = AirLogConfig::default();
        config.api.base_url.clear();
        config.api.timeout_seconds = 0;
        config.logging.format.clear();
        config.apply_defaults();
        assert_eq!(config.api.base_url, "https://api.openweathermap.org");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\nkey = \"from-file\"\ntimeout_seconds = 5\n\n[ledger]\npath = \"/tmp/airlog.csv\""
        )
        .unwrap();

        let config = AirLogConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.api.timeout_seconds, 5);
        assert_eq!(config.ledger.path, PathBuf::from("/tmp/airlog.csv"));
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = AirLogConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("airlog"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
