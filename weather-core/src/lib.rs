//! Weather resolution and travel advisory engine for Nigerian cities.
//!
//! This crate defines:
//! - Location resolution (Nigeria first, then global) via a geocoding provider
//! - Forecast fetching and normalization in current/hourly/daily shapes
//! - Two-city travel advisories and single-city activity suggestions
//! - Configuration, the Open-Meteo provider client and the error taxonomy
//!
//! It is used by `naija-weather-cli`, but any chat agent or HTTP handler can
//! drive [`WeatherEngine`] directly.

pub mod activities;
pub mod advisory;
pub mod conditions;
pub mod config;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod resolver;

pub use config::Config;
pub use engine::WeatherEngine;
pub use error::WeatherError;
pub use model::{
    ActivitySuggestion, CityWeatherSummary, Coordinates, ForecastMode, ForecastPoint,
    NormalizedForecast, TravelAdvisory,
};
pub use provider::{ForecastProvider, GeocodingProvider, OpenMeteoClient};
