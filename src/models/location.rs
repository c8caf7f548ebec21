//! Geographic coordinates produced by the geocoder

use serde::{Deserialize, Serialize};

/// Location coordinates
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
