//! Map surface double that records every call.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::domain::ports::{LocationHandle, MapSurface, MarkerHandle, Route};
use crate::domain::{Bounds, Coordinate, PlaceId, PlaceSummary, lock};

/// One recorded map call.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Marker drawn for a place.
    MarkerCreated(MarkerHandle, PlaceId),
    /// Marker removed.
    MarkerRemoved(MarkerHandle),
    /// User-location marker drawn.
    UserLocationPlaced(LocationHandle, Coordinate),
    /// User-location marker moved.
    UserLocationMoved(LocationHandle, Coordinate),
    /// User-location marker removed.
    UserLocationRemoved(LocationHandle),
    /// Route overlay drawn.
    RouteRendered(usize),
    /// Route overlay removed.
    RouteCleared,
    /// Viewport panned.
    Panned(Coordinate),
    /// Zoom changed.
    Zoomed(u8),
    /// Viewport fitted to bounds.
    Fitted(Bounds),
}

/// Recording map surface with live-marker bookkeeping.
#[derive(Debug, Default)]
pub struct RecordingMapSurface {
    next_handle: AtomicU64,
    compact: AtomicBool,
    events: Mutex<Vec<MapEvent>>,
    live_markers: Mutex<BTreeMap<MarkerHandle, PlaceId>>,
    user_location: Mutex<Option<LocationHandle>>,
    route_visible: AtomicBool,
}

impl RecordingMapSurface {
    /// Surface laid out for a wide screen.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface laid out for a narrow screen.
    #[must_use]
    pub fn compact() -> Self {
        let surface = Self::default();
        surface.compact.store(true, Ordering::SeqCst);
        surface
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<MapEvent> {
        lock(&self.events).clone()
    }

    /// Forget recorded calls while keeping live state.
    pub fn clear_events(&self) {
        lock(&self.events).clear();
    }

    /// Markers currently drawn.
    #[must_use]
    pub fn live_markers(&self) -> BTreeMap<MarkerHandle, PlaceId> {
        lock(&self.live_markers).clone()
    }

    /// User-location marker currently drawn, if any.
    #[must_use]
    pub fn user_location(&self) -> Option<LocationHandle> {
        *lock(&self.user_location)
    }

    /// Whether a route overlay is drawn.
    #[must_use]
    pub fn route_visible(&self) -> bool {
        self.route_visible.load(Ordering::SeqCst)
    }

    fn record(&self, event: MapEvent) {
        lock(&self.events).push(event);
    }

    fn next(&self) -> u64 {
        self.next_handle.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl MapSurface for RecordingMapSurface {
    fn create_marker(&self, place: &PlaceSummary) -> MarkerHandle {
        let handle = MarkerHandle(self.next());
        lock(&self.live_markers)
            .insert(handle, place.id.clone());
        self.record(MapEvent::MarkerCreated(handle, place.id.clone()));
        handle
    }

    fn remove_marker(&self, handle: MarkerHandle) {
        lock(&self.live_markers)
            .remove(&handle);
        self.record(MapEvent::MarkerRemoved(handle));
    }

    fn place_user_location(&self, coordinate: Coordinate, _accuracy_metres: f64) -> LocationHandle {
        let handle = LocationHandle(self.next());
        *lock(&self.user_location) = Some(handle);
        self.record(MapEvent::UserLocationPlaced(handle, coordinate));
        handle
    }

    fn move_user_location(
        &self,
        handle: LocationHandle,
        coordinate: Coordinate,
        _accuracy_metres: f64,
    ) {
        self.record(MapEvent::UserLocationMoved(handle, coordinate));
    }

    fn remove_user_location(&self, handle: LocationHandle) {
        *lock(&self.user_location) = None;
        self.record(MapEvent::UserLocationRemoved(handle));
    }

    fn render_route(&self, route: &Route) {
        self.route_visible.store(true, Ordering::SeqCst);
        self.record(MapEvent::RouteRendered(route.path.len()));
    }

    fn clear_route(&self) {
        self.route_visible.store(false, Ordering::SeqCst);
        self.record(MapEvent::RouteCleared);
    }

    fn pan_to(&self, coordinate: Coordinate) {
        self.record(MapEvent::Panned(coordinate));
    }

    fn set_zoom(&self, zoom: u8) {
        self.record(MapEvent::Zoomed(zoom));
    }

    fn fit_bounds(&self, bounds: Bounds) {
        self.record(MapEvent::Fitted(bounds));
    }

    fn is_compact(&self) -> bool {
        self.compact.load(Ordering::SeqCst)
    }
}
