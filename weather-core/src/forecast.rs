//! Shapes raw provider blocks into a [`NormalizedForecast`].
//!
//! * current: instant block for temperature, wind speed and condition;
//!   hourly entry 0 for feels-like, humidity, gusts, precipitation and UV.
//! * hourly: up to 24 points; top-level fields mirror entry 0.
//! * daily: up to 7 points, each day's temperature is the mean of max and min.
//!
//! Hourly and daily modes report humidity and wind as 0. Those values are
//! not part of the blocks requested for these modes and must stay 0.

use std::sync::Arc;

use tracing::debug;

use crate::{
    Coordinates, ForecastMode, ForecastPoint, NormalizedForecast, WeatherError, conditions,
    provider::{DailyBlock, ForecastProvider, HourlyBlock, InstantBlock, RawForecast},
};

#[derive(Debug, Clone)]
pub struct ForecastFetcher {
    provider: Arc<dyn ForecastProvider>,
}

impl ForecastFetcher {
    pub fn new(provider: Arc<dyn ForecastProvider>) -> Self {
        Self { provider }
    }

    /// Fetch and normalize weather for `coords`. All-or-nothing: either every
    /// field the mode needs is present or the call fails.
    pub async fn fetch(
        &self,
        coords: &Coordinates,
        mode: ForecastMode,
    ) -> Result<NormalizedForecast, WeatherError> {
        let raw = self.provider.forecast(coords, mode).await?;
        let forecast = normalize(raw, &coords.canonical_name, mode)?;

        debug!(
            location = %forecast.location,
            %mode,
            points = forecast.series.len(),
            "Normalized forecast"
        );

        Ok(forecast)
    }
}

/// Reshape `raw` into the output shape for `mode`.
pub fn normalize(
    raw: RawForecast,
    location: &str,
    mode: ForecastMode,
) -> Result<NormalizedForecast, WeatherError> {
    match mode {
        ForecastMode::Current => {
            let instant = raw
                .current_weather
                .ok_or_else(|| WeatherError::data_missing(location, "current weather"))?;
            let hourly =
                raw.hourly.ok_or_else(|| WeatherError::data_missing(location, "hourly"))?;
            current(&instant, &hourly, location)
        }
        ForecastMode::Hourly => {
            let hourly =
                raw.hourly.ok_or_else(|| WeatherError::data_missing(location, "hourly"))?;
            hourly_series(&hourly, location)
        }
        ForecastMode::Daily => {
            let daily = raw.daily.ok_or_else(|| WeatherError::data_missing(location, "daily"))?;
            daily_series(&daily, location)
        }
    }
}

fn current(
    instant: &InstantBlock,
    hourly: &HourlyBlock,
    location: &str,
) -> Result<NormalizedForecast, WeatherError> {
    const NOW: usize = 0;

    let temperature = present(instant.temperature, location, "current_weather.temperature")?;
    let wind_speed = present(instant.windspeed, location, "current_weather.windspeed")?;
    let code = present(instant.weathercode, location, "current_weather.weathercode")?;

    let feels_like = required(&hourly.apparent_temperature, NOW, location, "apparent_temperature")?;
    let humidity = required(&hourly.relativehumidity_2m, NOW, location, "relativehumidity_2m")?;
    let wind_gust = required(&hourly.windgusts_10m, NOW, location, "windgusts_10m")?;

    Ok(NormalizedForecast {
        location: location.to_string(),
        temperature: round(temperature),
        feels_like: round(feels_like),
        humidity: round(humidity),
        wind_speed: round(wind_speed),
        wind_gust: round(wind_gust),
        conditions: conditions::label_for(code).to_string(),
        precipitation_probability: optional(&hourly.precipitation_probability, NOW),
        uv_index: optional(&hourly.uv_index, NOW),
        series: Vec::new(),
    })
}

fn hourly_series(hourly: &HourlyBlock, location: &str) -> Result<NormalizedForecast, WeatherError> {
    let series = hourly
        .time
        .iter()
        .take(ForecastMode::Hourly.series_len())
        .enumerate()
        .map(|(i, time)| -> Result<ForecastPoint, WeatherError> {
            let temperature = required(&hourly.temperature_2m, i, location, "temperature_2m")?;
            Ok(ForecastPoint {
                time: time_at(time.as_deref(), i, location)?,
                temperature: round(temperature),
                conditions: label_at(&hourly.weathercode, i, location)?,
                precipitation_probability: optional(&hourly.precipitation_probability, i),
                uv_index: optional(&hourly.uv_index, i),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    mirror_first(series, location, "hourly")
}

fn daily_series(daily: &DailyBlock, location: &str) -> Result<NormalizedForecast, WeatherError> {
    let series = daily
        .time
        .iter()
        .take(ForecastMode::Daily.series_len())
        .enumerate()
        .map(|(i, time)| -> Result<ForecastPoint, WeatherError> {
            let max = required(&daily.temperature_2m_max, i, location, "temperature_2m_max")?;
            let min = required(&daily.temperature_2m_min, i, location, "temperature_2m_min")?;
            Ok(ForecastPoint {
                time: time_at(time.as_deref(), i, location)?,
                temperature: round((max + min) / 2.0),
                conditions: label_at(&daily.weathercode, i, location)?,
                precipitation_probability: optional(&daily.precipitation_probability_max, i),
                uv_index: None,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    mirror_first(series, location, "daily")
}

/// Top-level fields copy the first point; humidity and wind are 0.
fn mirror_first(
    series: Vec<ForecastPoint>,
    location: &str,
    block: &str,
) -> Result<NormalizedForecast, WeatherError> {
    let first = series.first().ok_or_else(|| WeatherError::data_missing(location, block))?;

    Ok(NormalizedForecast {
        location: location.to_string(),
        temperature: first.temperature,
        feels_like: first.temperature,
        humidity: 0,
        wind_speed: 0,
        wind_gust: 0,
        conditions: first.conditions.clone(),
        precipitation_probability: None,
        uv_index: None,
        series,
    })
}

fn round(value: f64) -> i32 {
    value.round() as i32
}

fn present<T>(value: Option<T>, location: &str, field: &str) -> Result<T, WeatherError> {
    value.ok_or_else(|| WeatherError::data_missing(location, field))
}

fn required<T: Copy>(
    values: &[Option<T>],
    index: usize,
    location: &str,
    field: &str,
) -> Result<T, WeatherError> {
    values
        .get(index)
        .copied()
        .flatten()
        .ok_or_else(|| WeatherError::data_missing(location, format!("{field}[{index}]")))
}

fn optional(values: &[Option<f64>], index: usize) -> Option<i32> {
    values.get(index).copied().flatten().map(round)
}

fn time_at(time: Option<&str>, index: usize, location: &str) -> Result<String, WeatherError> {
    present(time.map(str::to_string), location, &format!("time[{index}]"))
}

fn label_at(codes: &[Option<i32>], index: usize, location: &str) -> Result<String, WeatherError> {
    required(codes, index, location, "weathercode")
        .map(|code| conditions::label_for(code).to_string())
}
