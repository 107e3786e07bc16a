//! Plain-text rendering of engine results.

use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveDateTime};
use naija_weather_core::{CityWeatherSummary, ForecastPoint, NormalizedForecast, TravelAdvisory};

pub fn forecast(f: &NormalizedForecast) -> String {
    let mut out = format!("{}: {}°C, {}\n", f.location, f.temperature, f.conditions);

    if f.series.is_empty() {
        let _ = writeln!(out, "  Feels like: {}°C", f.feels_like);
        let _ = writeln!(out, "  Humidity:   {}%", f.humidity);
        let _ = writeln!(out, "  Wind:       {} km/h (gusts {} km/h)", f.wind_speed, f.wind_gust);
        if let Some(p) = f.precipitation_probability {
            let _ = writeln!(out, "  Rain:       {p}%");
        }
        if let Some(uv) = f.uv_index {
            let _ = writeln!(out, "  UV index:   {uv}");
        }
    } else {
        for point in &f.series {
            let _ = writeln!(out, "  {}", series_line(point));
        }
    }

    out.trim_end().to_string()
}

pub fn advisory(a: &TravelAdvisory) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "From {}", city_line(&a.origin));
    let _ = writeln!(out, "To   {}", city_line(&a.destination));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", a.narrative);
    let _ = writeln!(out);
    for tip in &a.recommendations {
        let _ = writeln!(out, "  - {tip}");
    }
    out.trim_end().to_string()
}

fn city_line(city: &CityWeatherSummary) -> String {
    let line = format!("{}: {}°C, {}", city.city, city.temperature, city.conditions);
    match city.precipitation_probability {
        Some(p) => format!("{line}, {p}% chance of rain"),
        None => line,
    }
}

fn series_line(point: &ForecastPoint) -> String {
    let mut line = format!(
        "{:<12} {:>3}°C  {}",
        time_label(&point.time),
        point.temperature,
        point.conditions
    );
    if let Some(p) = point.precipitation_probability {
        let _ = write!(line, ", {p}% rain");
    }
    if let Some(uv) = point.uv_index {
        let _ = write!(line, ", UV {uv}");
    }
    line
}

/// "2025-06-01T14:00" → "Sun 14:00", "2025-06-01" → "Sun 01 Jun".
/// Anything else is shown unchanged.
fn time_label(raw: &str) -> String {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return dt.format("%a %H:%M").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%a %d %b").to_string();
    }
    raw.to_string()
}
