use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use naija_weather_core::{Config, ForecastMode, WeatherEngine};
use serde::Serialize;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "naija-weather",
    version,
    about = "Weather and travel advisories for Nigerian cities"
)]
pub struct Cli {
    /// Print raw JSON instead of formatted text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure provider endpoints, country filter and timeouts.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, e.g. "Lagos" or "Port Harcourt".
        location: String,

        /// One of: current, hourly, daily.
        #[arg(long, short, default_value = "current")]
        mode: ForecastMode,
    },

    /// Travel advisory between two cities.
    Travel {
        from: String,
        to: String,

        /// Departure time, e.g. "6PM", "morning", "evening".
        #[arg(long, short)]
        departure: Option<String>,
    },

    /// Suggest activities for a city based on its weather.
    Activities {
        location: String,

        #[arg(long, short, default_value = "current")]
        mode: ForecastMode,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let json = self.json;

        match self.command {
            Command::Configure => configure(),
            Command::Show { location, mode } => {
                let forecast = engine()?
                    .get_weather(&location, mode)
                    .await
                    .with_context(|| format!("Could not get {mode} weather for '{location}'"))?;
                emit(json, &forecast, render::forecast)
            }
            Command::Travel { from, to, departure } => {
                let advisory = engine()?
                    .get_travel_advisory(&from, &to, departure.as_deref())
                    .await
                    .with_context(|| {
                        format!("Could not build travel advisory from '{from}' to '{to}'")
                    })?;
                emit(json, &advisory, render::advisory)
            }
            Command::Activities { location, mode } => {
                let suggestion = engine()?
                    .suggest_activities(&location, mode)
                    .await
                    .with_context(|| format!("Could not suggest activities for '{location}'"))?;
                emit(json, &suggestion, |s| s.text.clone())
            }
        }
    }
}

fn engine() -> Result<WeatherEngine> {
    let config = Config::load()?;
    WeatherEngine::from_config(&config)
}

fn emit<T: Serialize>(json: bool, value: &T, human: impl Fn(&T) -> String) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{out}");
    } else {
        println!("{}", human(value));
    }
    Ok(())
}

fn configure() -> Result<()> {
    let current = Config::load()?;

    let geocoding_url = Text::new("Geocoding endpoint:")
        .with_default(&current.geocoding_url)
        .prompt()
        .context("Configuration cancelled")?;

    let forecast_url = Text::new("Forecast endpoint:")
        .with_default(&current.forecast_url)
        .prompt()
        .context("Configuration cancelled")?;

    let country_code = Text::new("Country searched first (ISO code):")
        .with_default(&current.country_code)
        .prompt()
        .context("Configuration cancelled")?
        .to_uppercase();

    let timeout_secs = CustomType::<u64>::new("HTTP timeout in seconds:")
        .with_default(current.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Configuration cancelled")?;

    let deadline_secs = CustomType::<u64>::new("Overall deadline in seconds (0 for none):")
        .with_default(current.deadline_secs.unwrap_or(0))
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Configuration cancelled")?;

    let config = Config {
        geocoding_url,
        forecast_url,
        country_code,
        timeout_secs,
        deadline_secs: (deadline_secs > 0).then_some(deadline_secs),
        ..current
    };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
