//! Two-city travel advisory.
//!
//! Both cities are resolved and fetched concurrently (current + hourly each).
//! The narrative's precipitation signal is hour 0 of each city's hourly
//! series; the wet-road tips read the current-mode precipitation instead.
//! The estimated travel window is not taken into account.

use chrono::{NaiveTime, Timelike};
use tracing::{debug, warn};

use crate::{
    CityWeatherSummary, ForecastMode, NormalizedForecast, TravelAdvisory, WeatherError,
    forecast::ForecastFetcher, resolver::LocationResolver,
};

/// Per-city precipitation probability above which the narrative warns of rain.
pub const RAIN_NARRATIVE_THRESHOLD: i32 = 50;
/// Highest current precipitation probability of both cities above which
/// wet-road tips apply.
pub const WET_ROAD_THRESHOLD: i32 = 60;
/// Either city's temperature above which heat tips apply.
pub const HEAT_TIP_THRESHOLD: i32 = 30;
/// Mean of both temperatures above which the narrative mentions heat.
pub const HOT_MEAN_THRESHOLD: f64 = 32.0;
/// Mean of both temperatures below which the narrative mentions cool weather.
pub const COOL_MEAN_THRESHOLD: f64 = 24.0;

const GENERAL_TIPS: [&str; 2] = [
    "Check your fuel level before you comot",
    "Make sure your phone battery full for navigation",
];

const WET_ROAD_TIPS: [&str; 3] = [
    "Drive slower than usual - road go slippery",
    "Make sure your wipers dey work well",
    "Check your tires - rain no be friend to bald tires",
];

const HEAT_TIPS: [&str; 2] = [
    "Carry extra water to avoid dehydration",
    "If you get AC, better use am for this heat",
];

const NIGHT_TIPS: [&str; 2] = [
    "Make sure your headlights dey work properly",
    "Watch out for bad roads - e hard to see for night",
];

const CLOSING_TIPS: [&str; 2] = [
    "No forget your driver license and papers - police dey wait 😂",
    "If traffic hold you, patient na virtue 🙏",
];

#[derive(Debug, Clone)]
pub struct TravelAdvisor {
    resolver: LocationResolver,
    fetcher: ForecastFetcher,
}

/// Current and hourly weather for one city.
#[derive(Debug, Clone)]
struct CityWeather {
    current: NormalizedForecast,
    hourly: NormalizedForecast,
}

impl CityWeather {
    fn summary(&self) -> CityWeatherSummary {
        CityWeatherSummary {
            city: self.current.location.clone(),
            temperature: self.current.temperature,
            conditions: self.current.conditions.clone(),
            precipitation_probability: self
                .hourly
                .series
                .first()
                .and_then(|point| point.precipitation_probability),
        }
    }
}

impl TravelAdvisor {
    pub fn new(resolver: LocationResolver, fetcher: ForecastFetcher) -> Self {
        Self { resolver, fetcher }
    }

    /// Build an advisory for travel from `from` to `to`.
    ///
    /// Fails with the first error raised by either city; no partial advisory
    /// is produced.
    pub async fn advise(
        &self,
        from: &str,
        to: &str,
        departure_hint: Option<&str>,
    ) -> Result<TravelAdvisory, WeatherError> {
        let departure_hint = departure_hint.filter(|hint| !hint.trim().is_empty());

        let (origin, destination) =
            tokio::try_join!(self.city_weather(from), self.city_weather(to)).inspect_err(|e| {
                warn!(from, to, error = %e, "Travel advisory aborted");
            })?;

        let tips = recommendations(&origin.current, &destination.current, departure_hint);
        let origin = origin.summary();
        let destination = destination.summary();

        debug!(
            from = %origin.city,
            to = %destination.city,
            origin_precipitation = ?origin.precipitation_probability,
            destination_precipitation = ?destination.precipitation_probability,
            "Composing travel advisory"
        );

        Ok(TravelAdvisory {
            narrative: narrative(from, to, departure_hint, &origin, &destination),
            recommendations: tips,
            origin,
            destination,
        })
    }

    async fn city_weather(&self, query: &str) -> Result<CityWeather, WeatherError> {
        let coords = self.resolver.resolve(query).await?;
        let (current, hourly) = tokio::try_join!(
            self.fetcher.fetch(&coords, ForecastMode::Current),
            self.fetcher.fetch(&coords, ForecastMode::Hourly),
        )?;
        Ok(CityWeather { current, hourly })
    }
}

/// Narrative text. `from` and `to` are used as the caller wrote them.
pub fn narrative(
    from: &str,
    to: &str,
    departure_hint: Option<&str>,
    origin: &CityWeatherSummary,
    destination: &CityWeatherSummary,
) -> String {
    let mut advice = format!("If you dey go from {from} to {to}");

    if let Some(hint) = departure_hint {
        advice.push_str(&format!(" around {hint}"));
    }

    let origin_wet = precipitation(origin) > RAIN_NARRATIVE_THRESHOLD;
    let destination_wet = precipitation(destination) > RAIN_NARRATIVE_THRESHOLD;

    match (origin_wet, destination_wet) {
        (true, true) => advice.push_str(
            ", rain go show face for both cities ☔. Better carry umbrella and drive carefully oo!",
        ),
        (true, false) => advice.push_str(&format!(
            ", rain go start for {from} before you reach {to} 🌧️. Check your wipers before you comot!"
        )),
        (false, true) => advice.push_str(&format!(
            ", weather dey okay for {from} but rain go welcome you for {to} ☔. Prepare for wet road!"
        )),
        (false, false) => {
            advice.push_str(", the weather dey cooperate well well 🌤️. Good journey ahead!")
        }
    }

    let mean = f64::from(origin.temperature + destination.temperature) / 2.0;
    if mean > HOT_MEAN_THRESHOLD {
        advice.push_str(" E go hot small - better carry water for the road 💧.");
    } else if mean < COOL_MEAN_THRESHOLD {
        advice.push_str(" Weather dey cool - you go enjoy the journey 🌬️.");
    }

    advice
}

/// Recommendation list: general, wet-road, heat, night, closing. In that order.
///
/// `origin` and `destination` are the current-mode forecasts of both cities.
pub fn recommendations(
    origin: &NormalizedForecast,
    destination: &NormalizedForecast,
    departure_hint: Option<&str>,
) -> Vec<String> {
    let mut tips: Vec<&str> = GENERAL_TIPS.to_vec();

    let rain_now = |f: &NormalizedForecast| f.precipitation_probability.unwrap_or(0);
    if rain_now(origin).max(rain_now(destination)) > WET_ROAD_THRESHOLD {
        tips.extend(WET_ROAD_TIPS);
    }

    if origin.temperature > HEAT_TIP_THRESHOLD || destination.temperature > HEAT_TIP_THRESHOLD {
        tips.extend(HEAT_TIPS);
    }

    if departure_hint.is_some_and(is_night_departure) {
        tips.extend(NIGHT_TIPS);
    }

    tips.extend(CLOSING_TIPS);
    tips.into_iter().map(str::to_string).collect()
}

/// True when the hint mentions night or evening, or names a clock time
/// between 18:00 and 04:59.
pub fn is_night_departure(hint: &str) -> bool {
    let lower = hint.to_lowercase();
    if lower.contains("night") || lower.contains("evening") {
        return true;
    }

    clock_hour(hint).is_some_and(|hour| hour >= 18 || hour < 5)
}

/// Hour of the first clock time in `hint`: "9PM", "9:30 pm", "21:00".
/// A bare number without a meridiem or minutes is not a clock time.
fn clock_hour(hint: &str) -> Option<u32> {
    let compact: String =
        hint.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_uppercase();
    let mut rest = compact.as_str();

    while let Some(start) = rest.find(|c: char| c.is_ascii_digit()) {
        let run = &rest[start..];
        let end = run.find(|c: char| !(c.is_ascii_digit() || c == ':')).unwrap_or(run.len());
        let (clock, suffix) = run.split_at(end);

        if let Some(time) = parse_clock(clock, suffix) {
            return Some(time.hour());
        }
        rest = suffix;
    }

    None
}

fn parse_clock(clock: &str, suffix: &str) -> Option<NaiveTime> {
    match ["AM", "PM"].into_iter().find(|m| suffix.starts_with(m)) {
        Some(meridiem) if clock.contains(':') => {
            NaiveTime::parse_from_str(&format!("{clock}{meridiem}"), "%I:%M%p").ok()
        }
        Some(meridiem) => {
            NaiveTime::parse_from_str(&format!("{clock}:00{meridiem}"), "%I:%M%p").ok()
        }
        None if clock.contains(':') => NaiveTime::parse_from_str(clock, "%H:%M").ok(),
        None => None,
    }
}

fn precipitation(city: &CityWeatherSummary) -> i32 {
    city.precipitation_probability.unwrap_or(0)
}
