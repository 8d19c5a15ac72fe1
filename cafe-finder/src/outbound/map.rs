//! Map surface for hosts without a map widget.
//!
//! Every call is logged; handles are allocated from a counter so the
//! reconciler's bookkeeping behaves exactly as with a real widget.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::info;

use crate::domain::ports::{LocationHandle, MapSurface, MarkerHandle, Route};
use crate::domain::{Bounds, Coordinate, PlaceSummary};

/// Headless map surface that logs each operation.
#[derive(Debug, Default)]
pub struct HeadlessMapSurface {
    next_handle: AtomicU64,
    compact: bool,
}

impl HeadlessMapSurface {
    /// Surface reporting a wide layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface reporting a narrow layout, which suppresses selection zoom.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            compact: true,
            ..Self::default()
        }
    }

    fn allocate(&self) -> u64 {
        self.next_handle.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl MapSurface for HeadlessMapSurface {
    fn create_marker(&self, place: &PlaceSummary) -> MarkerHandle {
        let handle = MarkerHandle(self.allocate());
        info!(%handle, place_id = %place.id, name = %place.name, "marker created");
        handle
    }

    fn remove_marker(&self, handle: MarkerHandle) {
        info!(%handle, "marker removed");
    }

    fn place_user_location(&self, coordinate: Coordinate, accuracy_metres: f64) -> LocationHandle {
        let handle = LocationHandle(self.allocate());
        info!(
            latitude = coordinate.latitude(),
            longitude = coordinate.longitude(),
            accuracy_metres,
            "user location placed"
        );
        handle
    }

    fn move_user_location(
        &self,
        _handle: LocationHandle,
        coordinate: Coordinate,
        accuracy_metres: f64,
    ) {
        info!(
            latitude = coordinate.latitude(),
            longitude = coordinate.longitude(),
            accuracy_metres,
            "user location moved"
        );
    }

    fn remove_user_location(&self, _handle: LocationHandle) {
        info!("user location removed");
    }

    fn render_route(&self, route: &Route) {
        info!(
            points = route.path.len(),
            distance_metres = route.distance_metres,
            duration_secs = route.duration_secs,
            "route rendered"
        );
    }

    fn clear_route(&self) {
        info!("route cleared");
    }

    fn pan_to(&self, coordinate: Coordinate) {
        info!(
            latitude = coordinate.latitude(),
            longitude = coordinate.longitude(),
            "panned"
        );
    }

    fn set_zoom(&self, zoom: u8) {
        info!(zoom, "zoomed");
    }

    fn fit_bounds(&self, bounds: Bounds) {
        info!(
            south = bounds.south_west.latitude(),
            west = bounds.south_west.longitude(),
            north = bounds.north_east.latitude(),
            east = bounds.north_east.longitude(),
            "viewport fitted"
        );
    }

    fn is_compact(&self) -> bool {
        self.compact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures::summary;

    #[test]
    fn handles_are_unique_across_overlay_kinds() {
        let surface = HeadlessMapSurface::new();
        let first = surface.create_marker(&summary("a"));
        let location = surface.place_user_location(summary("b").coordinate, 5.0);
        let second = surface.create_marker(&summary("c"));

        assert_eq!(first, MarkerHandle(1));
        assert_eq!(location, LocationHandle(2));
        assert_eq!(second, MarkerHandle(3));
        assert!(!surface.is_compact());
        assert!(HeadlessMapSurface::compact().is_compact());
    }
}
