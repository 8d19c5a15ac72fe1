//! Finder configuration loaded via OrthoConfig.
//!
//! Every value is optional in the environment. A missing or blank API key is
//! not an error: the provider slots are filled with disabled adapters and the
//! session shows the missing-key banner.

use std::sync::Arc;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::domain::ports::{
    DirectionsProvider, DisabledDirectionsProvider, DisabledPlacesProvider, PlacesProvider,
};
use crate::outbound::google::{
    DEFAULT_PHOTO_MAX_WIDTH, DEFAULT_PLACES_ENDPOINT, DEFAULT_ROUTES_ENDPOINT, GooglePlacesHttp,
    GoogleRoutesHttp, PhotoUrlBuilder,
};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration values for the provider adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CAFE_FINDER")]
pub struct FinderSettings {
    /// Maps Platform API key.
    pub api_key: Option<String>,
    /// Places API base URL override.
    pub places_endpoint: Option<String>,
    /// Routes API base URL override.
    pub routes_endpoint: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Width requested for photo media.
    pub photo_max_width: Option<u32>,
}

/// Failure turning settings into adapters.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An endpoint override is not a valid URL.
    #[error("invalid {field} URL: {source}")]
    InvalidEndpoint {
        /// Setting name.
        field: &'static str,
        /// Parse failure.
        source: url::ParseError,
    },
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Provider adapters selected by the settings.
pub struct ProviderSet {
    /// Places adapter, disabled without a key.
    pub places: Arc<dyn PlacesProvider>,
    /// Routes adapter, disabled without a key.
    pub directions: Arc<dyn DirectionsProvider>,
    /// Photo URL builder, present only with a key.
    pub photos: Option<PhotoUrlBuilder>,
    /// Whether the places client initialised.
    pub ready: bool,
}

impl FinderSettings {
    /// Configured key, or `None` when missing or blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Places API base URL.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidEndpoint`] for an unparsable override.
    pub fn places_endpoint(&self) -> Result<Url, SettingsError> {
        endpoint(
            "places_endpoint",
            self.places_endpoint.as_deref(),
            DEFAULT_PLACES_ENDPOINT,
        )
    }

    /// Routes API base URL.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidEndpoint`] for an unparsable override.
    pub fn routes_endpoint(&self) -> Result<Url, SettingsError> {
        endpoint(
            "routes_endpoint",
            self.routes_endpoint.as_deref(),
            DEFAULT_ROUTES_ENDPOINT,
        )
    }

    /// Per-request timeout; zero falls back to the default.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        let secs = self
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Width requested for photo media.
    #[must_use]
    pub fn photo_max_width(&self) -> u32 {
        self.photo_max_width.unwrap_or(DEFAULT_PHOTO_MAX_WIDTH)
    }

    /// Build the provider adapters these settings describe.
    ///
    /// # Errors
    /// Returns [`SettingsError`] for bad endpoint overrides or when the HTTP
    /// client cannot be built.
    pub fn providers(&self) -> Result<ProviderSet, SettingsError> {
        let Some(key) = self.api_key() else {
            warn!("CAFE_FINDER_API_KEY not set; places and routes disabled");
            return Ok(ProviderSet {
                places: Arc::new(DisabledPlacesProvider),
                directions: Arc::new(DisabledDirectionsProvider),
                photos: None,
                ready: false,
            });
        };
        let timeout = self.request_timeout();
        let places_endpoint = self.places_endpoint()?;
        let places = GooglePlacesHttp::new(places_endpoint.clone(), key, timeout)?;
        let directions = GoogleRoutesHttp::new(self.routes_endpoint()?, key, timeout)?;
        let photos = PhotoUrlBuilder::new(key, self.photo_max_width())
            .map_err(|source| SettingsError::InvalidEndpoint {
                field: "photo_endpoint",
                source,
            })?;
        Ok(ProviderSet {
            places: Arc::new(places),
            directions: Arc::new(directions),
            photos: Some(photos),
            ready: true,
        })
    }
}

fn endpoint(
    field: &'static str,
    configured: Option<&str>,
    fallback: &str,
) -> Result<Url, SettingsError> {
    let raw = configured.unwrap_or(fallback);
    let mut url =
        Url::parse(raw).map_err(|source| SettingsError::InvalidEndpoint { field, source })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    //! Unit tests for finder configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "CAFE_FINDER_API_KEY",
        "CAFE_FINDER_PLACES_ENDPOINT",
        "CAFE_FINDER_ROUTES_ENDPOINT",
        "CAFE_FINDER_REQUEST_TIMEOUT_SECS",
        "CAFE_FINDER_PHOTO_MAX_WIDTH",
    ];

    fn load_from_empty_args() -> FinderSettings {
        FinderSettings::load_from_iter([OsString::from("cafe-finder")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert!(settings.api_key().is_none());
        assert_eq!(
            settings.places_endpoint().expect("default parses").as_str(),
            DEFAULT_PLACES_ENDPOINT
        );
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
        assert_eq!(settings.photo_max_width(), DEFAULT_PHOTO_MAX_WIDTH);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CAFE_FINDER_API_KEY", Some(" k3y ".to_owned())),
            (
                "CAFE_FINDER_PLACES_ENDPOINT",
                Some("http://127.0.0.1:8080/v1".to_owned()),
            ),
            ("CAFE_FINDER_ROUTES_ENDPOINT", None),
            ("CAFE_FINDER_REQUEST_TIMEOUT_SECS", Some("3".to_owned())),
            ("CAFE_FINDER_PHOTO_MAX_WIDTH", Some("800".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.api_key(), Some("k3y"));
        assert_eq!(
            settings.places_endpoint().expect("override parses").as_str(),
            "http://127.0.0.1:8080/v1/"
        );
        assert_eq!(settings.request_timeout(), Duration::from_secs(3));
        assert_eq!(settings.photo_max_width(), 800);
    }

    #[rstest]
    #[case::missing(None)]
    #[case::blank(Some("   "))]
    fn missing_key_selects_disabled_adapters(#[case] key: Option<&str>) {
        let settings = FinderSettings {
            api_key: key.map(str::to_owned),
            places_endpoint: None,
            routes_endpoint: None,
            request_timeout_secs: None,
            photo_max_width: None,
        };

        let providers = settings.providers().expect("no key is not fatal");

        assert!(!providers.ready);
        assert!(providers.photos.is_none());
    }

    #[test]
    fn bad_endpoint_override_is_reported() {
        let settings = FinderSettings {
            api_key: Some("k3y".to_owned()),
            places_endpoint: None,
            routes_endpoint: Some("not a url".to_owned()),
            request_timeout_secs: None,
            photo_max_width: None,
        };

        let error = settings.providers().err().expect("invalid override");

        assert!(matches!(
            error,
            SettingsError::InvalidEndpoint {
                field: "routes_endpoint",
                ..
            }
        ));
    }
}
