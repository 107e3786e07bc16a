use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Which provider block, and which output shape, a forecast request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMode {
    #[default]
    Current,
    Hourly,
    Daily,
}

impl ForecastMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMode::Current => "current",
            ForecastMode::Hourly => "hourly",
            ForecastMode::Daily => "daily",
        }
    }

    pub const fn all() -> &'static [ForecastMode] {
        &[ForecastMode::Current, ForecastMode::Hourly, ForecastMode::Daily]
    }

    /// Number of series points this mode produces with full provider data.
    pub const fn series_len(&self) -> usize {
        match self {
            ForecastMode::Current => 0,
            ForecastMode::Hourly => 24,
            ForecastMode::Daily => 7,
        }
    }
}

impl fmt::Display for ForecastMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "current" => Ok(ForecastMode::Current),
            "hourly" => Ok(ForecastMode::Hourly),
            "daily" => Ok(ForecastMode::Daily),
            _ => Err(anyhow::anyhow!(
                "Invalid forecast mode '{value}'. Must be one of: current, hourly, daily."
            )),
        }
    }
}

/// A resolved place. Recomputed for every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub canonical_name: String,
}

/// One entry of an hourly or daily series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// ISO-8601 time (hourly) or date (daily), as the provider sent it.
    pub time: String,
    pub temperature: i32,
    pub conditions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation_probability: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<i32>,
}

/// Weather for one location in one of the three [`ForecastMode`] shapes.
///
/// In hourly and daily modes `humidity`, `wind_speed` and `wind_gust` are
/// always 0: the provider shape used for those modes does not carry them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedForecast {
    pub location: String,
    pub temperature: i32,
    pub feels_like: i32,
    pub humidity: i32,
    pub wind_speed: i32,
    pub wind_gust: i32,
    pub conditions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation_probability: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<i32>,
    pub series: Vec<ForecastPoint>,
}

/// Per-city slice of a [`TravelAdvisory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityWeatherSummary {
    pub city: String,
    pub temperature: i32,
    pub conditions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation_probability: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelAdvisory {
    pub origin: CityWeatherSummary,
    pub destination: CityWeatherSummary,
    pub narrative: String,
    pub recommendations: Vec<String>,
}

/// Rule-based activity suggestion for a single location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySuggestion {
    pub location: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_mode_as_str_roundtrip() {
        for mode in ForecastMode::all() {
            let parsed: ForecastMode = mode.as_str().parse().expect("roundtrip should succeed");
            assert_eq!(*mode, parsed);
        }
    }

    #[test]
    fn forecast_mode_parse_is_case_insensitive() {
        assert_eq!("Hourly".parse::<ForecastMode>().unwrap(), ForecastMode::Hourly);
        assert_eq!(" DAILY ".parse::<ForecastMode>().unwrap(), ForecastMode::Daily);
    }

    #[test]
    fn unknown_forecast_mode_error() {
        let err = "weekly".parse::<ForecastMode>().unwrap_err();
        assert!(err.to_string().contains("Invalid forecast mode 'weekly'"));
    }

    #[test]
    fn series_len_per_mode() {
        assert_eq!(ForecastMode::Current.series_len(), 0);
        assert_eq!(ForecastMode::Hourly.series_len(), 24);
        assert_eq!(ForecastMode::Daily.series_len(), 7);
    }

    #[test]
    fn forecast_serializes_camel_case_and_skips_absent_optionals() {
        let forecast = NormalizedForecast {
            location: "Lagos".into(),
            temperature: 29,
            feels_like: 33,
            humidity: 80,
            wind_speed: 12,
            wind_gust: 20,
            conditions: "Slight rain".into(),
            precipitation_probability: None,
            uv_index: Some(6),
            series: Vec::new(),
        };

        let json = serde_json::to_value(&forecast).unwrap();
        assert_eq!(json["feelsLike"], 33);
        assert_eq!(json["windGust"], 20);
        assert_eq!(json["uvIndex"], 6);
        assert!(json.get("precipitationProbability").is_none());
    }
}
