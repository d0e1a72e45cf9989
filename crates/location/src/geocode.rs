//! Reverse geocoding: coordinate to human-readable place.
//!
//! Geocoding is strictly best-effort. The service swallows every error
//! from this module and keeps the coordinate-only snapshot, so the
//! listing flow never depends on the geocoding vendor being up.

use garilink_geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

/// Default public reverse-geocoding endpoint (no API key required).
const DEFAULT_GEOCODE_URL: &str = "https://api.bigdatacloud.net/data/reverse-geocode-client";

/// Environment variable overriding the geocoding endpoint.
const GEOCODE_URL_VAR: &str = "GARILINK_GEOCODE_URL";

/// Human-readable place information derived from a coordinate.
///
/// All fields are optional; [`PlaceInfo::default`] is the "no address
/// data available" value a failed lookup degrades to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceInfo {
    /// City or locality name.
    pub city: Option<String>,
    /// State, province or county.
    pub state: Option<String>,
    /// Country name.
    pub country: Option<String>,
    /// Single-line display address assembled from the parts above.
    pub formatted_address: Option<String>,
}

impl PlaceInfo {
    /// True when no field carries data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.state.is_none() && self.country.is_none()
    }
}

/// Failures from a reverse-geocoding lookup.
///
/// Callers of [`crate::LocationService`] never see these; the service
/// logs them and proceeds with coordinates only.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Transport-level failure.
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-2xx status.
    #[error("geocoding endpoint returned HTTP {0}")]
    Status(u16),

    /// Payload did not match the expected shape.
    #[error("malformed geocoding response: {0}")]
    Malformed(String),
}

/// Injected reverse-geocoding capability.
#[allow(async_fn_in_trait)]
pub trait ReverseGeocoder: Send + Sync + 'static {
    /// Looks up place information for a coordinate.
    ///
    /// # Errors
    /// Any [`GeocodeError`]; the caller decides whether to degrade.
    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> std::result::Result<PlaceInfo, GeocodeError>;
}

/// Configuration for [`HttpReverseGeocoder`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Endpoint URL for the reverse-geocode GET.
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Locality language passed to the endpoint.
    pub locale: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEOCODE_URL.to_string(),
            timeout: Duration::from_secs(5),
            locale: "en".to_string(),
        }
    }
}

impl GeocoderConfig {
    /// Builds a configuration, honouring the `GARILINK_GEOCODE_URL`
    /// environment override.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var(GEOCODE_URL_VAR) {
            if !url.is_empty() {
                config.endpoint = url;
            }
        }
        config
    }
}

/// Production reverse geocoder backed by an HTTP JSON endpoint.
#[derive(Debug, Clone)]
pub struct HttpReverseGeocoder {
    client: reqwest::Client,
    config: GeocoderConfig,
}

impl HttpReverseGeocoder {
    /// Creates a geocoder with the given configuration.
    ///
    /// # Errors
    /// [`GeocodeError::Http`] if the underlying client cannot be built.
    pub fn new(config: GeocoderConfig) -> std::result::Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a geocoder from environment configuration.
    ///
    /// # Errors
    /// [`GeocodeError::Http`] if the underlying client cannot be built.
    pub fn from_env() -> std::result::Result<Self, GeocodeError> {
        Self::new(GeocoderConfig::from_env())
    }

    /// Endpoint this geocoder talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

impl ReverseGeocoder for HttpReverseGeocoder {
    #[instrument(skip(self), fields(endpoint = %self.config.endpoint))]
    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> std::result::Result<PlaceInfo, GeocodeError> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("latitude", coordinate.latitude.to_string()),
                ("longitude", coordinate.longitude.to_string()),
                ("localityLanguage", self.config.locale.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body: ReverseGeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Malformed(e.to_string()))?;

        Ok(body.into_place())
    }
}

/// Wire shape of the reverse-geocode endpoint response.
#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    city: Option<String>,
    locality: Option<String>,
    #[serde(rename = "principalSubdivision")]
    principal_subdivision: Option<String>,
    #[serde(rename = "countryName")]
    country_name: Option<String>,
}

impl ReverseGeocodeResponse {
    fn into_place(self) -> PlaceInfo {
        // Some responses carry only `locality`, some only `city`.
        let city = self
            .city
            .filter(|c| !c.is_empty())
            .or_else(|| self.locality.filter(|l| !l.is_empty()));
        let state = self.principal_subdivision.filter(|s| !s.is_empty());
        let country = self.country_name.filter(|c| !c.is_empty());

        let parts: Vec<&str> = [city.as_deref(), state.as_deref(), country.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        let formatted_address = if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        };

        PlaceInfo {
            city,
            state,
            country,
            formatted_address,
        }
    }
}
