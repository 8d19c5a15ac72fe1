//! Driven port for one-shot route computation.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Bounds, Coordinate};

/// Travel mode passed to the directions provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TravelMode {
    /// On foot; the only mode the finder requests.
    #[default]
    Walking,
}

impl TravelMode {
    /// Provider spelling of the mode.
    #[must_use]
    pub const fn provider_mode(self) -> &'static str {
        match self {
            Self::Walking => "WALK",
        }
    }
}

/// Route request between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    /// Device position at request time.
    pub origin: Coordinate,
    /// Selected place.
    pub destination: Coordinate,
    /// Travel mode.
    pub mode: TravelMode,
}

/// Route geometry returned by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Ordered path from origin to destination.
    pub path: Vec<Coordinate>,
    /// Route length in metres.
    pub distance_metres: u32,
    /// Expected travel time in seconds.
    pub duration_secs: u64,
    /// Viewport enclosing the whole path.
    pub bounds: Bounds,
}

define_port_error! {
    /// Errors surfaced while computing a route.
    pub enum DirectionsProviderError {
        /// Provider answered with a non-success status such as `ZERO_RESULTS`.
        Status {
            /// Provider status code such as `ZERO_RESULTS`.
            status: String,
        } => "directions status {status}",
        /// Network transport failed before receiving a response.
        Transport {
            /// Human-readable cause.
            message: String,
        } => "directions transport failed: {message}",
        /// Response body could not be decoded.
        Decode {
            /// Human-readable cause.
            message: String,
        } => "directions response decode failed: {message}",
    }
}

impl DirectionsProviderError {
    /// Status code reported to the user.
    ///
    /// Transport and decode failures have no provider status, so they map to
    /// fixed codes.
    #[must_use]
    pub fn status_code(&self) -> &str {
        match self {
            Self::Status { status } => status.as_str(),
            Self::Transport { .. } => "UNKNOWN_ERROR",
            Self::Decode { .. } => "INVALID_RESPONSE",
        }
    }
}

/// Port for computing routes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Compute a single route for the request.
    async fn compute_route(&self, request: &RouteRequest)
    -> Result<Route, DirectionsProviderError>;
}

/// Directions provider used when no credential is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledDirectionsProvider;

#[async_trait]
impl DirectionsProvider for DisabledDirectionsProvider {
    async fn compute_route(
        &self,
        _request: &RouteRequest,
    ) -> Result<Route, DirectionsProviderError> {
        Err(DirectionsProviderError::status("REQUEST_DENIED"))
    }
}
