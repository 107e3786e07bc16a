use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{Config, Coordinates, ForecastMode, WeatherError};

use super::{ForecastProvider, GeocodedPlace, GeocodingProvider, RawForecast};

/// Fields requested for the hourly block in current and hourly modes.
pub const HOURLY_FIELDS: &str = "temperature_2m,apparent_temperature,relativehumidity_2m,\
windspeed_10m,windgusts_10m,weathercode,precipitation_probability,uv_index";

pub const DAILY_FIELDS: &str =
    "weathercode,temperature_2m_max,temperature_2m_min,precipitation_probability_max";

/// Client for the Open-Meteo geocoding and forecast APIs. No API key needed.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoClient {
    pub fn new(geocoding_url: impl Into<String>, forecast_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            geocoding_url: geocoding_url.into(),
            forecast_url: forecast_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client for Open-Meteo")?;

        Ok(Self {
            http,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        subject: &str,
    ) -> Result<T, WeatherError> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| WeatherError::fetch_failed(subject, e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| WeatherError::fetch_failed(subject, e))?;

        if !status.is_success() {
            let message = format!(
                "Open-Meteo request failed with status {}: {}",
                status,
                truncate_body(&body)
            );
            return Err(WeatherError::fetch_failed(subject, message));
        }

        serde_json::from_str(&body).map_err(|e| WeatherError::fetch_failed(subject, e))
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeocodedPlace>>,
}

#[async_trait]
impl GeocodingProvider for OpenMeteoClient {
    async fn search(
        &self,
        name: &str,
        country: Option<&str>,
    ) -> Result<Option<GeocodedPlace>, WeatherError> {
        let mut query = vec![
            ("name", name.to_string()),
            ("count", "1".to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];
        if let Some(code) = country {
            query.push(("countryCode", code.to_string()));
        }

        debug!(name, country, "Querying Open-Meteo geocoding");

        let parsed: GeocodingResponse = self.get_json(&self.geocoding_url, &query, name).await?;
        Ok(parsed.results.and_then(|results| results.into_iter().next()))
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    async fn forecast(
        &self,
        coords: &Coordinates,
        mode: ForecastMode,
    ) -> Result<RawForecast, WeatherError> {
        let query = forecast_query(coords, mode);

        debug!(
            location = %coords.canonical_name,
            %mode,
            "Fetching Open-Meteo forecast"
        );

        self.get_json(&self.forecast_url, &query, &coords.canonical_name).await
    }
}

fn forecast_query(coords: &Coordinates, mode: ForecastMode) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("latitude", coords.latitude.to_string()),
        ("longitude", coords.longitude.to_string()),
        ("timezone", "auto".to_string()),
    ];

    match mode {
        ForecastMode::Current => {
            query.push(("current_weather", "true".to_string()));
            query.push(("hourly", HOURLY_FIELDS.to_string()));
        }
        ForecastMode::Hourly => {
            query.push(("hourly", HOURLY_FIELDS.to_string()));
            query.push(("forecast_hours", mode.series_len().to_string()));
        }
        ForecastMode::Daily => {
            query.push(("daily", DAILY_FIELDS.to_string()));
            query.push(("forecast_days", mode.series_len().to_string()));
        }
    }

    query
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
