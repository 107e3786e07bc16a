use std::{future::Future, sync::Arc, time::Duration};

use tracing::info;

use crate::{
    ActivitySuggestion, Config, ForecastMode, NormalizedForecast, TravelAdvisory, WeatherError,
    activities,
    advisory::TravelAdvisor,
    forecast::ForecastFetcher,
    provider::{ForecastProvider, GeocodingProvider, OpenMeteoClient},
    resolver::LocationResolver,
};

/// Entry point for callers. Holds no per-request state: every call resolves
/// and fetches from scratch.
#[derive(Debug, Clone)]
pub struct WeatherEngine {
    resolver: LocationResolver,
    fetcher: ForecastFetcher,
    advisor: TravelAdvisor,
    deadline: Option<Duration>,
}

impl WeatherEngine {
    pub fn new(
        geocoder: Arc<dyn GeocodingProvider>,
        forecaster: Arc<dyn ForecastProvider>,
    ) -> Self {
        Self::from_parts(LocationResolver::new(geocoder), ForecastFetcher::new(forecaster))
    }

    /// Engine backed by Open-Meteo, using the configured endpoints, country,
    /// HTTP timeout and deadline.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;

        let client = Arc::new(OpenMeteoClient::from_config(config)?);
        let resolver = LocationResolver::with_country(client.clone(), config.country_code.as_str());
        let mut engine = Self::from_parts(resolver, ForecastFetcher::new(client));
        engine.deadline = config.deadline();
        Ok(engine)
    }

    fn from_parts(resolver: LocationResolver, fetcher: ForecastFetcher) -> Self {
        let advisor = TravelAdvisor::new(resolver.clone(), fetcher.clone());
        Self { resolver, fetcher, advisor, deadline: None }
    }

    /// Bound every subsequent call. An elapsed deadline is reported as
    /// [`WeatherError::ProviderFetchFailed`].
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Weather for a free-text location in the requested shape.
    pub async fn get_weather(
        &self,
        location: &str,
        mode: ForecastMode,
    ) -> Result<NormalizedForecast, WeatherError> {
        let forecast = self
            .bounded(location, async {
                let coords = self.resolver.resolve(location).await?;
                self.fetcher.fetch(&coords, mode).await
            })
            .await?;

        info!(query = location, location = %forecast.location, %mode, "Weather ready");
        Ok(forecast)
    }

    /// Travel advisory between two free-text locations.
    pub async fn get_travel_advisory(
        &self,
        from: &str,
        to: &str,
        departure_hint: Option<&str>,
    ) -> Result<TravelAdvisory, WeatherError> {
        let subject = format!("{from} to {to}");
        let advisory =
            self.bounded(&subject, self.advisor.advise(from, to, departure_hint)).await?;

        info!(from, to, tips = advisory.recommendations.len(), "Travel advisory ready");
        Ok(advisory)
    }

    pub async fn suggest_activities(
        &self,
        location: &str,
        mode: ForecastMode,
    ) -> Result<ActivitySuggestion, WeatherError> {
        let forecast = self.get_weather(location, mode).await?;
        Ok(activities::suggest(&forecast))
    }

    async fn bounded<T>(
        &self,
        subject: &str,
        work: impl Future<Output = Result<T, WeatherError>>,
    ) -> Result<T, WeatherError> {
        match self.deadline {
            None => work.await,
            Some(deadline) => tokio::time::timeout(deadline, work)
                .await
                .map_err(|elapsed| WeatherError::fetch_failed(subject, elapsed))?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        forecast::tests::{FakeForecaster, current_payload, daily_payload, hourly_payload},
        resolver::tests::FakeGeocoder,
    };
    use std::error::Error as _;

    fn lagos_engine(forecaster: FakeForecaster) -> WeatherEngine {
        let geocoder = FakeGeocoder::default()
            .with_city("Lagos", 6.45, 3.39)
            .with_city("Abuja", 9.05, 7.49);
        WeatherEngine::new(Arc::new(geocoder), Arc::new(forecaster))
    }

    #[tokio::test]
    async fn get_weather_current_lagos() {
        let engine = lagos_engine(FakeForecaster::default().with(
            "Lagos",
            ForecastMode::Current,
            current_payload(29.4, 61, 30.0),
        ));

        let forecast = engine.get_weather("Lagos", ForecastMode::Current).await.unwrap();

        assert_eq!(forecast.temperature, 29);
        assert_eq!(forecast.conditions, "Slight rain");
        assert!(forecast.series.is_empty());
    }

    #[tokio::test]
    async fn get_weather_daily_has_seven_points() {
        let engine = lagos_engine(
            FakeForecaster::default().with("Lagos", ForecastMode::Daily, daily_payload()),
        );

        let forecast = engine.get_weather("Lagos", ForecastMode::Daily).await.unwrap();
        assert_eq!(forecast.series.len(), 7);
    }

    #[tokio::test]
    async fn get_weather_unknown_location() {
        let engine = lagos_engine(FakeForecaster::default());

        let err = engine.get_weather("Wakanda", ForecastMode::Current).await.unwrap_err();
        assert!(matches!(err, WeatherError::LocationNotFound { .. }));
        assert_eq!(err.subject(), "Wakanda");
    }

    #[tokio::test]
    async fn missing_block_surfaces_as_data_missing() {
        // Empty provider response: no blocks at all.
        let engine = lagos_engine(FakeForecaster::default());

        let err = engine.get_weather("Lagos", ForecastMode::Hourly).await.unwrap_err();
        assert!(matches!(
            err,
            WeatherError::ProviderDataMissing { ref block, .. } if block == "hourly"
        ));
    }

    #[tokio::test]
    async fn elapsed_deadline_reads_as_fetch_failure() {
        let engine = lagos_engine(
            FakeForecaster::default()
                .with("Lagos", ForecastMode::Current, current_payload(29.4, 61, 30.0))
                .delayed(Duration::from_secs(5)),
        )
        .with_deadline(Duration::from_millis(50));

        let err = engine.get_weather("Lagos", ForecastMode::Current).await.unwrap_err();

        assert!(matches!(
            err,
            WeatherError::ProviderFetchFailed { ref location, .. } if location == "Lagos"
        ));
        let cause = err.source().expect("timeout cause");
        assert!(cause.is::<tokio::time::error::Elapsed>());
    }

    #[tokio::test]
    async fn travel_advisory_through_engine() {
        let engine = lagos_engine(
            FakeForecaster::default()
                .with("Lagos", ForecastMode::Current, current_payload(28.0, 3, 65.0))
                .with("Lagos", ForecastMode::Hourly, hourly_payload(28.0, 65.0))
                .with("Abuja", ForecastMode::Current, current_payload(28.0, 3, 30.0))
                .with("Abuja", ForecastMode::Hourly, hourly_payload(28.0, 30.0)),
        );

        let advisory = engine.get_travel_advisory("Lagos", "Abuja", Some("10AM")).await.unwrap();

        let tips = &advisory.recommendations;
        assert!(tips.contains(&"Drive slower than usual - road go slippery".to_string()));
        assert!(!tips.contains(&"Carry extra water to avoid dehydration".to_string()));
        assert!(!tips.contains(&"Make sure your headlights dey work properly".to_string()));
        assert_eq!(
            tips[tips.len() - 2],
            "No forget your driver license and papers - police dey wait 😂"
        );
        assert_eq!(tips[tips.len() - 1], "If traffic hold you, patient na virtue 🙏");
        assert!(advisory.narrative.contains("rain go start for Lagos before you reach Abuja"));
    }

    #[tokio::test]
    async fn activities_follow_fetched_weather() {
        let engine = lagos_engine(FakeForecaster::default().with(
            "Lagos",
            ForecastMode::Current,
            current_payload(31.2, 0, 10.0),
        ));

        let suggestion = engine.suggest_activities("Lagos", ForecastMode::Current).await.unwrap();
        assert!(suggestion.text.starts_with("For Lagos today, na Clear sky you go see 31°C."));
        assert!(suggestion.text.contains("Perfect day for beach or outdoor sports!"));
    }

    #[test]
    fn from_config_applies_deadline() {
        let config = Config { deadline_secs: Some(12), ..Config::default() };
        let engine = WeatherEngine::from_config(&config).unwrap();
        assert_eq!(engine.deadline(), Some(Duration::from_secs(12)));
    }
}
