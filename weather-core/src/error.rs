use thiserror::Error;

/// Boxed cause carried by [`WeatherError::ProviderFetchFailed`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures surfaced by the engine. Nothing is recovered locally; every
/// variant names the input that caused it.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Neither the country-restricted nor the global geocoding query matched.
    #[error("Location '{query}' not found")]
    LocationNotFound { query: String },

    /// The provider answered but left out the block the forecast mode needs.
    #[error("No {block} data available for {location}")]
    ProviderDataMissing { location: String, block: String },

    /// Transport failure, non-2xx status, undecodable body or elapsed deadline.
    #[error("Failed to get weather for {location}: {source}")]
    ProviderFetchFailed {
        location: String,
        #[source]
        source: BoxError,
    },
}

impl WeatherError {
    pub fn not_found(query: impl Into<String>) -> Self {
        Self::LocationNotFound { query: query.into() }
    }

    pub fn data_missing(location: impl Into<String>, block: impl Into<String>) -> Self {
        Self::ProviderDataMissing { location: location.into(), block: block.into() }
    }

    pub fn fetch_failed(location: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ProviderFetchFailed { location: location.into(), source: source.into() }
    }

    /// The location string the failure refers to.
    pub fn subject(&self) -> &str {
        match self {
            Self::LocationNotFound { query } => query,
            Self::ProviderDataMissing { location, .. } => location,
            Self::ProviderFetchFailed { location, .. } => location,
        }
    }
}
