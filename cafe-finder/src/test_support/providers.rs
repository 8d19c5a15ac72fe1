//! Scripted provider doubles.
//!
//! Each call pops the next scripted reply in call order. A reply may carry a
//! release gate: the call reports entry on the optional `entered` channel,
//! then waits for the gate before answering. Calls dropped while waiting
//! never answer, which is how transport-level cancellation shows up.

use std::collections::VecDeque;
use std::future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{Notify, mpsc};

use crate::domain::ports::{
    DirectionsProvider, DirectionsProviderError, Geolocation, GeolocationError,
    NearbySearchRequest, PlacesProvider, PlacesProviderError, PositionFix, RawPlace, Route,
    RouteRequest, TextSearchRequest,
};
use crate::domain::{Bounds, Coordinate, PlaceId, lock};

struct Reply<T> {
    result: T,
    release: Option<Arc<Notify>>,
}

struct Script<T> {
    replies: Mutex<VecDeque<Reply<T>>>,
    calls: AtomicUsize,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl<T> Script<T> {
    fn push(&self, result: T, release: Option<Arc<Notify>>) {
        lock(&self.replies).push_back(Reply { result, release });
    }

    fn next(&self) -> Option<Reply<T>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.replies).pop_front()
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

async fn answer<T>(
    reply: Option<Reply<T>>,
    entered: Option<&mpsc::UnboundedSender<&'static str>>,
    label: &'static str,
    exhausted: impl FnOnce() -> T,
) -> T {
    if let Some(entered) = entered {
        #[expect(
            clippy::let_underscore_must_use,
            reason = "listeners may stop watching once they have seen enough calls"
        )]
        let _ = entered.send(label);
    }
    let Some(reply) = reply else {
        return exhausted();
    };
    if let Some(release) = reply.release {
        release.notified().await;
    }
    reply.result
}

type Batch = Result<Vec<RawPlace>, PlacesProviderError>;

/// Places provider answering from per-operation scripts.
#[derive(Default)]
pub struct ScriptedPlacesProvider {
    nearby: Script<Batch>,
    text: Script<Batch>,
    details: Script<Result<RawPlace, PlacesProviderError>>,
    nearby_requests: Mutex<Vec<NearbySearchRequest>>,
    text_queries: Mutex<Vec<String>>,
    detail_requests: Mutex<Vec<(PlaceId, Vec<&'static str>)>>,
    entered: Option<mpsc::UnboundedSender<&'static str>>,
}

impl ScriptedPlacesProvider {
    /// Empty script; unscripted calls fail with a rejection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report each call's operation name on `entered` as it starts.
    #[must_use]
    pub fn with_entered(mut self, entered: mpsc::UnboundedSender<&'static str>) -> Self {
        self.entered = Some(entered);
        self
    }

    /// Script the next nearby-search reply.
    pub fn push_nearby(&self, result: Batch) {
        self.nearby.push(result, None);
    }

    /// Script a nearby-search reply held until `release` is notified.
    pub fn push_nearby_gated(&self, result: Batch, release: Arc<Notify>) {
        self.nearby.push(result, Some(release));
    }

    /// Script the next text-search reply.
    pub fn push_text(&self, result: Batch) {
        self.text.push(result, None);
    }

    /// Script the next details reply.
    pub fn push_details(&self, result: Result<RawPlace, PlacesProviderError>) {
        self.details.push(result, None);
    }

    /// Script a details reply held until `release` is notified.
    pub fn push_details_gated(
        &self,
        result: Result<RawPlace, PlacesProviderError>,
        release: Arc<Notify>,
    ) {
        self.details.push(result, Some(release));
    }

    /// Number of nearby-search calls started.
    #[must_use]
    pub fn nearby_calls(&self) -> usize {
        self.nearby.calls()
    }

    /// Number of text-search calls started.
    #[must_use]
    pub fn text_calls(&self) -> usize {
        self.text.calls()
    }

    /// Number of detail fetches started.
    #[must_use]
    pub fn detail_calls(&self) -> usize {
        self.details.calls()
    }

    /// Nearby-search requests in call order.
    #[must_use]
    pub fn nearby_requests(&self) -> Vec<NearbySearchRequest> {
        lock(&self.nearby_requests).clone()
    }

    /// Text-search queries in call order.
    #[must_use]
    pub fn text_queries(&self) -> Vec<String> {
        lock(&self.text_queries).clone()
    }

    /// Detail fetches (identifier and field list) in call order.
    #[must_use]
    pub fn detail_requests(&self) -> Vec<(PlaceId, Vec<&'static str>)> {
        lock(&self.detail_requests).clone()
    }
}

fn exhausted<T>() -> Result<T, PlacesProviderError> {
    Err(PlacesProviderError::rejected("script exhausted unexpectedly"))
}

#[async_trait]
impl PlacesProvider for ScriptedPlacesProvider {
    async fn nearby_search(&self, request: &NearbySearchRequest) -> Batch {
        lock(&self.nearby_requests).push(request.clone());
        let reply = self.nearby.next();
        answer(reply, self.entered.as_ref(), "nearby", exhausted).await
    }

    async fn text_search(&self, request: &TextSearchRequest) -> Batch {
        lock(&self.text_queries).push(request.query.clone());
        let reply = self.text.next();
        answer(reply, self.entered.as_ref(), "text", exhausted).await
    }

    async fn fetch_details(
        &self,
        id: &PlaceId,
        fields: &[&'static str],
    ) -> Result<RawPlace, PlacesProviderError> {
        lock(&self.detail_requests).push((id.clone(), fields.to_vec()));
        let reply = self.details.next();
        answer(reply, self.entered.as_ref(), "details", exhausted).await
    }
}

/// Directions provider answering from a script.
#[derive(Default)]
pub struct ScriptedDirections {
    routes: Script<Result<Route, DirectionsProviderError>>,
    requests: Mutex<Vec<RouteRequest>>,
}

impl ScriptedDirections {
    /// Script the next route reply.
    pub fn push(&self, result: Result<Route, DirectionsProviderError>) {
        self.routes.push(result, None);
    }

    /// Script a route reply held until `release` is notified.
    pub fn push_gated(
        &self,
        result: Result<Route, DirectionsProviderError>,
        release: Arc<Notify>,
    ) {
        self.routes.push(result, Some(release));
    }

    /// Number of route computations started.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.routes.calls()
    }

    /// Route requests in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<RouteRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl DirectionsProvider for ScriptedDirections {
    async fn compute_route(
        &self,
        request: &RouteRequest,
    ) -> Result<Route, DirectionsProviderError> {
        lock(&self.requests).push(*request);
        let reply = self.routes.next();
        answer(reply, None, "route", || {
            Err(DirectionsProviderError::status("UNKNOWN_ERROR"))
        })
        .await
    }
}

/// Straight two-point route between `origin` and `destination`.
#[must_use]
pub fn straight_route(origin: Coordinate, destination: Coordinate) -> Route {
    let path = vec![origin, destination];
    let bounds = Bounds::enclosing(&path).unwrap_or(Bounds {
        south_west: origin,
        north_east: origin,
    });
    Route {
        distance_metres: 640,
        duration_secs: 480,
        path,
        bounds,
    }
}

/// Geolocation double answering from a script, or never.
#[derive(Default)]
pub struct ScriptedGeolocation {
    fixes: Script<Result<PositionFix, GeolocationError>>,
    hang: bool,
}

impl ScriptedGeolocation {
    /// Geolocation whose calls never complete.
    #[must_use]
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    /// Script the next position reply.
    pub fn push(&self, result: Result<PositionFix, GeolocationError>) {
        self.fixes.push(result, None);
    }

    /// Script a position reply held until `release` is notified.
    pub fn push_gated(&self, result: Result<PositionFix, GeolocationError>, release: Arc<Notify>) {
        self.fixes.push(result, Some(release));
    }

    /// Number of position requests started.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.fixes.calls()
    }
}

#[async_trait]
impl Geolocation for ScriptedGeolocation {
    async fn current_position(&self) -> Result<PositionFix, GeolocationError> {
        let reply = self.fixes.next();
        if self.hang {
            return future::pending().await;
        }
        answer(reply, None, "position", || {
            Err(GeolocationError::unavailable("script exhausted unexpectedly"))
        })
        .await
    }
}
