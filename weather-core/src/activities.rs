//! Rule-based activity suggestions for a single forecast.

use crate::{ActivitySuggestion, NormalizedForecast};

pub fn suggest(forecast: &NormalizedForecast) -> ActivitySuggestion {
    let mut text = format!(
        "For {} today, na {} you go see {}°C. ",
        forecast.location, forecast.conditions, forecast.temperature
    );

    text.push_str(match forecast.temperature {
        t if t > 30 => "E go hot small oo, better carry water 💧. ",
        t if t > 25 => "Weather dey warm, good for outdoor activities. ",
        _ => "Weather dey cool, good for waka. ",
    });

    if forecast.precipitation_probability.is_some_and(|p| p > 50) {
        text.push_str("Rain fit fall later, no forget umbrella ☔. ");
    }

    let conditions = forecast.conditions.to_lowercase();
    if conditions.contains("rain") || conditions.contains("drizzle") {
        text.push_str("Make you find indoor activities like cinema or shopping mall. ");
    } else if conditions.contains("clear") || conditions.contains("sunny") {
        text.push_str("Perfect day for beach or outdoor sports! ");
    } else if conditions.contains("cloud") {
        text.push_str("Good weather for sightseeing and photography. ");
    }

    text.push_str("Enjoy your day my Naija people! 🇳🇬");

    ActivitySuggestion { location: forecast.location.clone(), text }
}
