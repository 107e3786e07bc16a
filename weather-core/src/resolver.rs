//! Free-text place name → coordinates.
//!
//! The first query is restricted to the configured country (Nigeria by
//! default). If that is empty, the same query runs unrestricted. The
//! provider's top-ranked match is always taken as-is.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    Coordinates, WeatherError,
    config::DEFAULT_COUNTRY_CODE,
    provider::GeocodingProvider,
};

#[derive(Debug, Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn GeocodingProvider>,
    country_code: String,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn GeocodingProvider>) -> Self {
        Self::with_country(geocoder, DEFAULT_COUNTRY_CODE)
    }

    pub fn with_country(
        geocoder: Arc<dyn GeocodingProvider>,
        country_code: impl Into<String>,
    ) -> Self {
        Self { geocoder, country_code: country_code.into() }
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Resolve `query` to coordinates and a canonical display name.
    pub async fn resolve(&self, query: &str) -> Result<Coordinates, WeatherError> {
        if let Some(place) = self.geocoder.search(query, Some(&self.country_code)).await? {
            info!(query, name = %place.name, "Resolved location within {}", self.country_code);
            return Ok(place.into());
        }

        debug!(
            query,
            country = %self.country_code,
            "No restricted match, retrying without country filter"
        );

        match self.geocoder.search(query, None).await? {
            Some(place) => {
                info!(query, name = %place.name, "Resolved location globally");
                Ok(place.into())
            }
            None => Err(WeatherError::not_found(query)),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::provider::GeocodedPlace;
    use async_trait::async_trait;
    use std::{collections::HashMap, sync::Mutex};

    /// In-memory geocoder keyed by (lowercased name, country filter).
    #[derive(Debug, Default)]
    pub(crate) struct FakeGeocoder {
        places: HashMap<(String, Option<String>), GeocodedPlace>,
        failing: Vec<String>,
        pub(crate) calls: Mutex<Vec<(String, Option<String>)>>,
    }

    impl FakeGeocoder {
        pub(crate) fn with_place(
            mut self,
            query: &str,
            country: Option<&str>,
            name: &str,
            latitude: f64,
            longitude: f64,
        ) -> Self {
            self.places.insert(
                (query.to_lowercase(), country.map(str::to_string)),
                GeocodedPlace { latitude, longitude, name: name.to_string() },
            );
            self
        }

        /// Register a city in both the restricted and unrestricted indexes.
        pub(crate) fn with_city(self, name: &str, latitude: f64, longitude: f64) -> Self {
            self.with_place(name, Some("NG"), name, latitude, longitude)
                .with_place(name, None, name, latitude, longitude)
        }

        pub(crate) fn failing_on(mut self, query: &str) -> Self {
            self.failing.push(query.to_lowercase());
            self
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GeocodingProvider for FakeGeocoder {
        async fn search(
            &self,
            name: &str,
            country: Option<&str>,
        ) -> Result<Option<GeocodedPlace>, WeatherError> {
            self.calls.lock().unwrap().push((name.to_string(), country.map(str::to_string)));
            if self.failing.contains(&name.to_lowercase()) {
                return Err(WeatherError::fetch_failed(name, "geocoding service unavailable"));
            }
            Ok(self.places.get(&(name.to_lowercase(), country.map(str::to_string))).cloned())
        }
    }

    #[tokio::test]
    async fn restricted_match_skips_global_query() {
        let geocoder = Arc::new(FakeGeocoder::default().with_city("Lagos", 6.45, 3.39));
        let resolver = LocationResolver::new(geocoder.clone());

        let coords = resolver.resolve("Lagos").await.unwrap();

        assert_eq!(coords.canonical_name, "Lagos");
        assert_eq!(coords.latitude, 6.45);
        let calls = geocoder.calls.lock().unwrap();
        assert_eq!(*calls, vec![("Lagos".to_string(), Some("NG".to_string()))]);
    }

    #[tokio::test]
    async fn falls_back_to_global_match() {
        let geocoder = Arc::new(
            FakeGeocoder::default().with_place("Accra", None, "Accra", 5.56, -0.20),
        );
        let resolver = LocationResolver::new(geocoder.clone());

        let coords = resolver.resolve("Accra").await.unwrap();

        assert_eq!(coords.canonical_name, "Accra");
        assert_eq!(geocoder.call_count(), 2);
        let calls = geocoder.calls.lock().unwrap();
        assert_eq!(calls[1], ("Accra".to_string(), None));
    }

    #[tokio::test]
    async fn uses_canonical_name_from_provider() {
        let geocoder = Arc::new(
            FakeGeocoder::default().with_place("PH", Some("NG"), "Port Harcourt", 4.78, 7.01),
        );
        let resolver = LocationResolver::new(geocoder);

        let coords = resolver.resolve("PH").await.unwrap();
        assert_eq!(coords.canonical_name, "Port Harcourt");
    }

    #[tokio::test]
    async fn no_match_anywhere_is_location_not_found() {
        let geocoder = Arc::new(FakeGeocoder::default());
        let resolver = LocationResolver::new(geocoder.clone());

        let err = resolver.resolve("Atlantis").await.unwrap_err();

        assert!(matches!(err, WeatherError::LocationNotFound { ref query } if query == "Atlantis"));
        assert_eq!(geocoder.call_count(), 2);
    }

    #[tokio::test]
    async fn provider_failure_is_not_retried_globally() {
        let geocoder = Arc::new(FakeGeocoder::default().failing_on("Kano"));
        let resolver = LocationResolver::new(geocoder.clone());

        let err = resolver.resolve("Kano").await.unwrap_err();

        assert!(matches!(err, WeatherError::ProviderFetchFailed { .. }));
        assert_eq!(geocoder.call_count(), 1);
    }

    #[tokio::test]
    async fn custom_country_code_is_used_for_first_query() {
        let geocoder = Arc::new(
            FakeGeocoder::default().with_place("Kumasi", Some("GH"), "Kumasi", 6.69, -1.62),
        );
        let resolver = LocationResolver::with_country(geocoder.clone(), "GH");

        let coords = resolver.resolve("Kumasi").await.unwrap();
        assert_eq!(coords.canonical_name, "Kumasi");
        assert_eq!(resolver.country_code(), "GH");
        assert_eq!(geocoder.call_count(), 1);
    }
}
