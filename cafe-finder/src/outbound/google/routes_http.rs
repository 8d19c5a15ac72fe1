//! Reqwest-backed Routes API adapter for one-shot walking directions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::{directions_status_error, directions_transport_error};
use super::polyline::decode_polyline;
use super::{API_KEY_HEADER, FIELD_MASK_HEADER};
use crate::domain::Bounds;
use crate::domain::Coordinate;
use crate::domain::ports::{DirectionsProvider, DirectionsProviderError, Route, RouteRequest};

/// Public Routes API base URL.
pub const DEFAULT_ROUTES_ENDPOINT: &str = "https://routes.googleapis.com/";

const ROUTE_FIELD_MASK: &str =
    "routes.distanceMeters,routes.duration,routes.polyline.encodedPolyline";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesBody {
    origin: Waypoint,
    destination: Waypoint,
    travel_mode: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Waypoint {
    location: WaypointLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WaypointLocation {
    lat_lng: LatLngDto,
}

#[derive(Debug, Serialize)]
struct LatLngDto {
    latitude: f64,
    longitude: f64,
}

impl From<Coordinate> for Waypoint {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            location: WaypointLocation {
                lat_lng: LatLngDto {
                    latitude: coordinate.latitude(),
                    longitude: coordinate.longitude(),
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ComputeRoutesResponseDto {
    #[serde(default)]
    routes: Vec<RouteDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteDto {
    #[serde(default)]
    distance_meters: u32,
    duration: Option<String>,
    polyline: Option<PolylineDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PolylineDto {
    encoded_polyline: String,
}

/// Routes adapter performing HTTPS requests against one API base URL.
pub struct GoogleRoutesHttp {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl GoogleRoutesHttp {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    fn url(&self) -> Result<Url, DirectionsProviderError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| DirectionsProviderError::status("INVALID_REQUEST"))?
            .pop_if_empty()
            .extend(["directions", "v2:computeRoutes"]);
        Ok(url)
    }
}

#[async_trait]
impl DirectionsProvider for GoogleRoutesHttp {
    async fn compute_route(
        &self,
        request: &RouteRequest,
    ) -> Result<Route, DirectionsProviderError> {
        let body = ComputeRoutesBody {
            origin: request.origin.into(),
            destination: request.destination.into(),
            travel_mode: request.mode.provider_mode(),
        };
        let response = self
            .client
            .post(self.url()?)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(FIELD_MASK_HEADER, ROUTE_FIELD_MASK)
            .json(&body)
            .send()
            .await
            .map_err(|error| directions_transport_error(&error))?;

        let status = response.status();
        let payload = response
            .bytes()
            .await
            .map_err(|error| directions_transport_error(&error))?;
        if !status.is_success() {
            return Err(directions_status_error(status, payload.as_ref()));
        }
        let route = parse_route(payload.as_ref())?;
        debug!(
            points = route.path.len(),
            distance_metres = route.distance_metres,
            "route computed"
        );
        Ok(route)
    }
}

fn parse_route(body: &[u8]) -> Result<Route, DirectionsProviderError> {
    let decoded: ComputeRoutesResponseDto = serde_json::from_slice(body).map_err(|error| {
        DirectionsProviderError::decode(format!("invalid routes JSON payload: {error}"))
    })?;
    let Some(route) = decoded.routes.into_iter().next() else {
        return Err(DirectionsProviderError::status("ZERO_RESULTS"));
    };
    let encoded = route
        .polyline
        .ok_or_else(|| DirectionsProviderError::decode("route has no polyline"))?;
    let path = decode_polyline(&encoded.encoded_polyline)
        .map_err(|error| DirectionsProviderError::decode(error.to_string()))?;
    let bounds = Bounds::enclosing(&path)
        .ok_or_else(|| DirectionsProviderError::decode("route polyline is empty"))?;
    Ok(Route {
        distance_metres: route.distance_meters,
        duration_secs: route.duration.as_deref().map_or(0, parse_duration),
        path,
        bounds,
    })
}

/// Whole seconds from a protobuf duration string such as `"480s"` or `"12.5s"`.
fn parse_duration(raw: &str) -> u64 {
    raw.strip_suffix('s')
        .and_then(|seconds| seconds.split('.').next())
        .and_then(|whole| whole.parse().ok())
        .unwrap_or(0)
}
