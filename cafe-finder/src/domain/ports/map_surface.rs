//! Driven port for the interactive map widget.
//!
//! Only the marker reconciler talks to this port. Calls are synchronous
//! because map widgets apply them on the UI thread without suspending.

use std::fmt;

use crate::domain::{Bounds, Coordinate, PlaceSummary, Route};

/// Opaque handle to a rendered place marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub u64);

impl fmt::Display for MarkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// Opaque handle to the user-location marker and its accuracy circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationHandle(pub u64);

/// Map operations the reconciler needs.
#[cfg_attr(test, mockall::automock)]
pub trait MapSurface: Send + Sync {
    /// Draw a marker for `place` and return its handle.
    fn create_marker(&self, place: &PlaceSummary) -> MarkerHandle;

    /// Remove a previously created marker.
    fn remove_marker(&self, handle: MarkerHandle);

    /// Draw the user-location marker with an accuracy circle.
    fn place_user_location(&self, coordinate: Coordinate, accuracy_metres: f64)
    -> LocationHandle;

    /// Reposition the existing user-location marker.
    fn move_user_location(
        &self,
        handle: LocationHandle,
        coordinate: Coordinate,
        accuracy_metres: f64,
    );

    /// Remove the user-location marker and accuracy circle.
    fn remove_user_location(&self, handle: LocationHandle);

    /// Draw (or redraw) the single route overlay.
    fn render_route(&self, route: &Route);

    /// Remove the route overlay.
    fn clear_route(&self);

    /// Center the viewport on `coordinate`.
    fn pan_to(&self, coordinate: Coordinate);

    /// Set the zoom level.
    fn set_zoom(&self, zoom: u8);

    /// Fit the viewport to `bounds`.
    fn fit_bounds(&self, bounds: Bounds);

    /// Return whether the surface is laid out for a narrow (mobile) screen.
    fn is_compact(&self) -> bool;
}
