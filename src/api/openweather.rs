//! OpenWeatherMap response structures and conversion utilities
//!
//! Every field is optional at the wire level so that a missing value can be
//! reported by name instead of surfacing as an opaque decode error.

use crate::AirLogError;
use crate::error::Endpoint;
use crate::models::{AirQualitySnapshot, Coordinates, WeatherSnapshot};
use serde::Deserialize;

/// One candidate from the direct geocoding endpoint
#[derive(Debug, Deserialize)]
pub struct GeocodingCandidate {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub country: Option<String>,
    pub state: Option<String>,
}

impl TryFrom<GeocodingCandidate> for Coordinates {
    type Error = AirLogError;

    fn try_from(candidate: GeocodingCandidate) -> Result<Self, Self::Error> {
        let latitude = candidate
            .lat
            .ok_or_else(|| AirLogError::missing_field(Endpoint::Geocoding, "lat"))?;
        let longitude = candidate
            .lon
            .ok_or_else(|| AirLogError::missing_field(Endpoint::Geocoding, "lon"))?;
        Ok(Coordinates::new(latitude, longitude))
    }
}

/// Current weather response
#[derive(Debug, Deserialize)]
pub struct WeatherResponse {
    pub main: Option<MainBlock>,
    pub wind: Option<WindBlock>,
    pub weather: Option<Vec<ConditionEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct MainBlock {
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct WindBlock {
    pub speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ConditionEntry {
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl TryFrom<WeatherResponse> for WeatherSnapshot {
    type Error = AirLogError;

    fn try_from(response: WeatherResponse) -> Result<Self, Self::Error> {
        let missing = |field: &str| AirLogError::missing_field(Endpoint::Weather, field);

        let main = response.main.ok_or_else(|| missing("main"))?;
        let wind = response.wind.ok_or_else(|| missing("wind"))?;
        let condition = response
            .weather
            .and_then(|entries| entries.into_iter().next())
            .ok_or_else(|| missing("weather[0]"))?;

        Ok(WeatherSnapshot {
            temperature_c: main.temp.ok_or_else(|| missing("main.temp"))?,
            humidity_pct: main.humidity.ok_or_else(|| missing("main.humidity"))?,
            wind_speed: wind.speed.ok_or_else(|| missing("wind.speed"))?,
            description: condition
                .description
                .ok_or_else(|| missing("weather[0].description"))?,
            icon_code: condition.icon.ok_or_else(|| missing("weather[0].icon"))?,
        })
    }
}

/// Air pollution response
#[derive(Debug, Deserialize)]
pub struct AirPollutionResponse {
    pub list: Option<Vec<AirReading>>,
}

#[derive(Debug, Deserialize)]
pub struct AirReading {
    pub main: Option<AqiBlock>,
    pub components: Option<Components>,
}

#[derive(Debug, Deserialize)]
pub struct AqiBlock {
    pub aqi: Option<i32>,
}

/// Pollutant concentrations in µg/m³
#[derive(Debug, Deserialize)]
pub struct Components {
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub no2: Option<f64>,
    pub so2: Option<f64>,
    pub co: Option<f64>,
}

impl TryFrom<AirPollutionResponse> for AirQualitySnapshot {
    type Error = AirLogError;

    fn try_from(response: AirPollutionResponse) -> Result<Self, Self::Error> {
        let missing = |field: &str| AirLogError::missing_field(Endpoint::AirQuality, field);

        // First entry is the most current reading
        let reading = response
            .list
            .and_then(|readings| readings.into_iter().next())
            .ok_or_else(|| AirLogError::malformed(Endpoint::AirQuality, "empty reading list"))?;

        let aqi = reading
            .main
            .and_then(|main| main.aqi)
            .ok_or_else(|| missing("list[0].main.aqi"))?;
        let components = reading
            .components
            .ok_or_else(|| missing("list[0].components"))?;

        Ok(AirQualitySnapshot {
            aqi,
            pm2_5: components.pm2_5.ok_or_else(|| missing("components.pm2_5"))?,
            pm10: components.pm10.ok_or_else(|| missing("components.pm10"))?,
            no2: components.no2.ok_or_else(|| missing("components.no2"))?,
            so2: components.so2.ok_or_else(|| missing("components.so2"))?,
            co: components.co.ok_or_else(|| missing("components.co"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weather_json() -> serde_json::Value {
        json!({
            "coord": {"lon": 20.0, "lat": 10.0},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 21.5, "feels_like": 21.0, "pressure": 1012, "humidity": 60},
            "wind": {"speed": 3.2, "deg": 180},
            "name": "Metropolis"
        })
    }

    #[test]
    fn test_weather_response_conversion() {
        let response: WeatherResponse = serde_json::from_value(weather_json()).unwrap();
        let snapshot = WeatherSnapshot::try_from(response).unwrap();
        assert_eq!(snapshot.temperature_c, 21.5);
        assert_eq!(snapshot.humidity_pct, 60.0);
        assert_eq!(snapshot.wind_speed, 3.2);
        assert_eq!(snapshot.description, "clear sky");
        assert_eq!(snapshot.icon_code, "01d");
    }

    #[test]
    fn test_weather_response_missing_field_is_named() {
        let mut value = weather_json();
        value["main"].as_object_mut().unwrap().remove("humidity");
        let response: WeatherResponse = serde_json::from_value(value).unwrap();
        let err = WeatherSnapshot::try_from(response).unwrap_err();
        assert!(err.to_string().contains("main.humidity"));
    }

    #[test]
    fn test_weather_response_empty_condition_list() {
        let mut value = weather_json();
        value["weather"] = json!([]);
        let response: WeatherResponse = serde_json::from_value(value).unwrap();
        let err = WeatherSnapshot::try_from(response).unwrap_err();
        assert!(matches!(
            err,
            AirLogError::MalformedResponse {
                endpoint: Endpoint::Weather,
                ..
            }
        ));
    }

    #[test]
    fn test_air_pollution_takes_first_reading() {
        let response: AirPollutionResponse = serde_json::from_value(json!({
            "coord": {"lon": 20.0, "lat": 10.0},
            "list": [
                {"main": {"aqi": 2}, "components": {"co": 200.0, "no": 0.1, "no2": 12.0, "o3": 60.0, "so2": 4.0, "pm2_5": 8.1, "pm10": 15.0, "nh3": 1.0}, "dt": 1},
                {"main": {"aqi": 5}, "components": {"co": 1.0, "no2": 1.0, "so2": 1.0, "pm2_5": 1.0, "pm10": 1.0}, "dt": 2}
            ]
        }))
        .unwrap();
        let snapshot = AirQualitySnapshot::try_from(response).unwrap();
        assert_eq!(snapshot.aqi, 2);
        assert_eq!(snapshot.pm2_5, 8.1);
        assert_eq!(snapshot.co, 200.0);
    }

    #[test]
    fn test_air_pollution_empty_list() {
        let response: AirPollutionResponse =
            serde_json::from_value(json!({"list": []})).unwrap();
        let err = AirQualitySnapshot::try_from(response).unwrap_err();
        assert!(err.to_string().contains("empty reading list"));
    }

    #[test]
    fn test_air_pollution_missing_pollutant() {
        let response: AirPollutionResponse = serde_json::from_value(json!({
            "list": [{"main": {"aqi": 3}, "components": {"co": 1.0, "no2": 1.0, "pm2_5": 1.0, "pm10": 1.0}}]
        }))
        .unwrap();
        let err = AirQualitySnapshot::try_from(response).unwrap_err();
        assert!(err.to_string().contains("components.so2"));
    }

    #[test]
    fn test_geocoding_candidate_conversion() {
        let candidate: GeocodingCandidate = serde_json::from_value(json!({
            "name": "Metropolis", "lat": 10.0, "lon": 20.0, "country": "US"
        }))
        .unwrap();
        let coords = Coordinates::try_from(candidate).unwrap();
        assert_eq!(coords, Coordinates::new(10.0, 20.0));
    }
}
