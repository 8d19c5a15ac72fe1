//! Driven port for the third-party places provider.
//!
//! The provider answers in one of two field-naming schemes, so this port
//! hands back raw JSON records and leaves normalisation to the domain.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::{Category, Coordinate, PlaceId};

/// Most records the provider returns for one nearby or text search.
pub const PROVIDER_PAGE_SIZE: u32 = 20;

/// Unnormalised place record exactly as the provider returned it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPlace(pub Value);

impl RawPlace {
    /// Borrow the underlying JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for RawPlace {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Nearby search restricted to a circle around `center`.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearchRequest {
    /// Circle center.
    pub center: Coordinate,
    /// Circle radius in metres, already clamped into the supported range.
    pub radius_metres: u32,
    /// Primary type restriction.
    pub included_type: Category,
    /// Maximum records requested.
    pub max_results: u32,
}

/// Free-text search used for suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearchRequest {
    /// Query text as typed.
    pub query: String,
    /// Maximum records requested.
    pub max_results: u32,
}

define_port_error! {
    /// Errors surfaced while calling the places provider.
    pub enum PlacesProviderError {
        /// No credential was configured, so the client never initialised.
        NotInitialised => "places client not initialised",
        /// Network transport failed before receiving a response.
        Transport {
            /// Human-readable cause.
            message: String,
        } => "places transport failed: {message}",
        /// Provider call exceeded the request timeout.
        Timeout {
            /// Human-readable cause.
            message: String,
        } => "places timeout: {message}",
        /// Provider throttled the request.
        RateLimited {
            /// Human-readable cause.
            message: String,
        } => "places rate limited request: {message}",
        /// Provider refused the request (bad key, bad field mask, unknown id).
        Rejected {
            /// Human-readable cause.
            message: String,
        } => "places request rejected: {message}",
        /// Response body could not be decoded.
        Decode {
            /// Human-readable cause.
            message: String,
        } => "places response decode failed: {message}",
    }
}

/// Port for searching and describing places.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Search for places of one type inside a circle.
    async fn nearby_search(
        &self,
        request: &NearbySearchRequest,
    ) -> Result<Vec<RawPlace>, PlacesProviderError>;

    /// Search for places matching free text.
    async fn text_search(
        &self,
        request: &TextSearchRequest,
    ) -> Result<Vec<RawPlace>, PlacesProviderError>;

    /// Fetch the given current-scheme fields for one place.
    async fn fetch_details(
        &self,
        id: &PlaceId,
        fields: &[&'static str],
    ) -> Result<RawPlace, PlacesProviderError>;
}

/// Provider used when no credential is configured; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPlacesProvider;

#[async_trait]
impl PlacesProvider for DisabledPlacesProvider {
    async fn nearby_search(
        &self,
        _request: &NearbySearchRequest,
    ) -> Result<Vec<RawPlace>, PlacesProviderError> {
        Err(PlacesProviderError::not_initialised())
    }

    async fn text_search(
        &self,
        _request: &TextSearchRequest,
    ) -> Result<Vec<RawPlace>, PlacesProviderError> {
        Err(PlacesProviderError::not_initialised())
    }

    async fn fetch_details(
        &self,
        _id: &PlaceId,
        _fields: &[&'static str],
    ) -> Result<RawPlace, PlacesProviderError> {
        Err(PlacesProviderError::not_initialised())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_provider_reports_missing_initialisation() {
        let provider = DisabledPlacesProvider;
        let err = provider
            .text_search(&TextSearchRequest {
                query: "chai".to_owned(),
                max_results: 5,
            })
            .await
            .expect_err("disabled provider fails");
        assert_eq!(err.to_string(), "places client not initialised");
    }
}
