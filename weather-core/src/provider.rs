use crate::{Coordinates, ForecastMode, WeatherError};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Top-ranked geocoding match.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodedPlace {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

impl From<GeocodedPlace> for Coordinates {
    fn from(place: GeocodedPlace) -> Self {
        Coordinates {
            latitude: place.latitude,
            longitude: place.longitude,
            canonical_name: place.name,
        }
    }
}

/// Forecast blocks exactly as the provider returned them.
///
/// A block the provider left out is `None`; that is a valid response, not a
/// protocol error. Field arrays are index-aligned with their `time` array.
/// Every value is nullable; nulls are rejected during normalization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawForecast {
    #[serde(default)]
    pub current_weather: Option<InstantBlock>,
    #[serde(default)]
    pub hourly: Option<HourlyBlock>,
    #[serde(default)]
    pub daily: Option<DailyBlock>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstantBlock {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default, alias = "wind_speed")]
    pub windspeed: Option<f64>,
    #[serde(default, alias = "weather_code")]
    pub weathercode: Option<i32>,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HourlyBlock {
    #[serde(default)]
    pub time: Vec<Option<String>>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub apparent_temperature: Vec<Option<f64>>,
    #[serde(default, alias = "relative_humidity_2m")]
    pub relativehumidity_2m: Vec<Option<f64>>,
    #[serde(default, alias = "wind_speed_10m")]
    pub windspeed_10m: Vec<Option<f64>>,
    #[serde(default, alias = "wind_gusts_10m")]
    pub windgusts_10m: Vec<Option<f64>>,
    #[serde(default, alias = "weather_code")]
    pub weathercode: Vec<Option<i32>>,
    #[serde(default)]
    pub precipitation_probability: Vec<Option<f64>>,
    #[serde(default)]
    pub uv_index: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DailyBlock {
    #[serde(default)]
    pub time: Vec<Option<String>>,
    #[serde(default, alias = "weather_code")]
    pub weathercode: Vec<Option<i32>>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<f64>>,
}

#[async_trait]
pub trait GeocodingProvider: Send + Sync + Debug {
    /// Return the provider's top match for `name`, optionally restricted to an
    /// ISO-3166 alpha-2 country code. `Ok(None)` means an empty result set.
    async fn search(
        &self,
        name: &str,
        country: Option<&str>,
    ) -> Result<Option<GeocodedPlace>, WeatherError>;
}

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Fetch the blocks `mode` needs for `coords`.
    async fn forecast(
        &self,
        coords: &Coordinates,
        mode: ForecastMode,
    ) -> Result<RawForecast, WeatherError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_forecast_tolerates_missing_blocks_and_nulls() {
        let raw: RawForecast = serde_json::from_value(json!({
            "latitude": 6.45,
            "longitude": 3.39,
            "hourly": {
                "time": ["2025-06-01T00:00", "2025-06-01T01:00"],
                "temperature_2m": [27.1, null],
                "weathercode": [3, 61]
            }
        }))
        .unwrap();

        assert!(raw.current_weather.is_none());
        assert!(raw.daily.is_none());

        let hourly = raw.hourly.unwrap();
        assert_eq!(hourly.temperature_2m, vec![Some(27.1), None]);
        assert!(hourly.uv_index.is_empty());
    }

    #[test]
    fn null_instant_and_time_values_still_decode() {
        let raw: RawForecast = serde_json::from_value(json!({
            "current_weather": {
                "temperature": null,
                "windspeed": 9.4,
                "weathercode": null
            },
            "daily": {
                "time": ["2025-06-01", null],
                "weathercode": [61, 3]
            }
        }))
        .unwrap();

        let instant = raw.current_weather.unwrap();
        assert_eq!(instant.temperature, None);
        assert_eq!(instant.windspeed, Some(9.4));
        assert_eq!(instant.weathercode, None);
        assert_eq!(raw.daily.unwrap().time, vec![Some("2025-06-01".to_string()), None]);
    }

    #[test]
    fn hourly_block_accepts_current_api_field_names() {
        let hourly: HourlyBlock = serde_json::from_value(json!({
            "time": ["2025-06-01T00:00"],
            "relative_humidity_2m": [84],
            "wind_gusts_10m": [22.3],
            "weather_code": [2]
        }))
        .unwrap();

        assert_eq!(hourly.relativehumidity_2m, vec![Some(84.0)]);
        assert_eq!(hourly.windgusts_10m, vec![Some(22.3)]);
        assert_eq!(hourly.weathercode, vec![Some(2)]);
    }

    #[test]
    fn geocoded_place_becomes_coordinates() {
        let coords: Coordinates =
            GeocodedPlace { latitude: 9.05, longitude: 7.49, name: "Abuja".into() }.into();
        assert_eq!(coords.canonical_name, "Abuja");
        assert_eq!(coords.latitude, 9.05);
    }
}
