//! Marker reconciliation and every other map overlay the finder owns.
//!
//! [`plan`] is a pure set difference over place identifiers. The
//! [`MarkerReconciler`] applies plans to a [`MapSurface`] and is the only
//! component that creates or removes markers, the user-location marker, or
//! the route overlay.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::ports::{LocationHandle, MapSurface, MarkerHandle, Route};
use super::{Center, Coordinate, PlaceId, PlaceSummary, lock};

/// Zoom applied when focusing a resolved place on a wide layout.
pub const SELECTION_ZOOM: u8 = 15;

/// Identifier-level diff between the drawn markers and a new result set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkerPlan {
    /// Identifiers needing a new marker, in result order.
    pub create: Vec<PlaceId>,
    /// Identifiers whose markers must be removed, sorted.
    pub destroy: Vec<PlaceId>,
    /// Identifiers whose markers stay untouched, in result order.
    pub keep: Vec<PlaceId>,
}

impl MarkerPlan {
    /// Return whether applying the plan changes nothing on the map.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.create.is_empty() && self.destroy.is_empty()
    }
}

/// Compute the marker diff for a new result set.
///
/// # Examples
/// ```
/// use cafe_finder::domain::{PlaceId, plan};
/// # use cafe_finder::domain::{Coordinate, PlaceSummary};
/// # fn summary(id: &str) -> PlaceSummary {
/// #     PlaceSummary {
/// #         id: PlaceId::new(id).unwrap(),
/// #         name: id.to_owned(),
/// #         coordinate: Coordinate::new(26.85, 80.95).unwrap(),
/// #         rating: None,
/// #         rating_count: None,
/// #         primary_photo: None,
/// #         address: None,
/// #         open_now: None,
/// #         business_status: None,
/// #     }
/// # }
/// let current: Vec<PlaceId> = ["1", "2", "3"]
///     .into_iter()
///     .map(|id| PlaceId::new(id).unwrap())
///     .collect();
/// let incoming = vec![summary("2"), summary("3"), summary("4")];
///
/// let plan = plan(&current, &incoming);
/// assert_eq!(plan.create, vec![PlaceId::new("4").unwrap()]);
/// assert_eq!(plan.destroy, vec![PlaceId::new("1").unwrap()]);
/// assert_eq!(plan.keep.len(), 2);
/// ```
#[must_use]
pub fn plan<'a>(
    current: impl IntoIterator<Item = &'a PlaceId>,
    incoming: &[PlaceSummary],
) -> MarkerPlan {
    let drawn: HashSet<&PlaceId> = current.into_iter().collect();
    let mut seen = HashSet::new();
    let mut result = MarkerPlan::default();
    for summary in incoming {
        if !seen.insert(&summary.id) {
            continue;
        }
        if drawn.contains(&summary.id) {
            result.keep.push(summary.id.clone());
        } else {
            result.create.push(summary.id.clone());
        }
    }
    let mut destroy: Vec<PlaceId> = drawn
        .into_iter()
        .filter(|id| !seen.contains(id))
        .cloned()
        .collect();
    destroy.sort();
    result.destroy = destroy;
    result
}

/// Surface calls made while applying one plan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkerDiff {
    /// Markers drawn.
    pub created: Vec<(PlaceId, MarkerHandle)>,
    /// Markers removed.
    pub destroyed: Vec<(PlaceId, MarkerHandle)>,
    /// Markers left in place.
    pub kept: Vec<(PlaceId, MarkerHandle)>,
}

#[derive(Debug, Default)]
struct Overlays {
    markers: HashMap<PlaceId, (MarkerHandle, PlaceSummary)>,
    by_handle: HashMap<MarkerHandle, PlaceId>,
    user_location: Option<LocationHandle>,
    route_visible: bool,
}

impl Overlays {
    fn remove_marker(&mut self, id: &PlaceId) -> Option<MarkerHandle> {
        let (handle, _) = self.markers.remove(id)?;
        self.by_handle.remove(&handle);
        Some(handle)
    }
}

/// Owner of every map overlay.
pub struct MarkerReconciler {
    surface: Arc<dyn MapSurface>,
    overlays: Mutex<Overlays>,
}

impl MarkerReconciler {
    /// Build a reconciler drawing on `surface`.
    #[must_use]
    pub fn new(surface: Arc<dyn MapSurface>) -> Self {
        Self {
            surface,
            overlays: Mutex::new(Overlays::default()),
        }
    }

    /// Bring the drawn markers in line with `summaries`.
    ///
    /// Markers for identifiers present before and after are not recreated;
    /// their stored summary is refreshed so clicks return the latest record.
    #[expect(
        clippy::must_use_candidate,
        reason = "the diff is informational; the map calls are the effect"
    )]
    pub fn reconcile(&self, summaries: &[PlaceSummary]) -> MarkerDiff {
        let mut overlays = lock(&self.overlays);
        let marker_plan = plan(overlays.markers.keys(), summaries);
        let mut diff = MarkerDiff::default();

        for id in &marker_plan.destroy {
            if let Some(handle) = overlays.remove_marker(id) {
                self.surface.remove_marker(handle);
                diff.destroyed.push((id.clone(), handle));
            }
        }

        let incoming: HashMap<&PlaceId, &PlaceSummary> =
            summaries.iter().map(|summary| (&summary.id, summary)).collect();
        for id in &marker_plan.keep {
            if let (Some(entry), Some(latest)) = (overlays.markers.get_mut(id), incoming.get(id)) {
                entry.1 = (*latest).clone();
                diff.kept.push((id.clone(), entry.0));
            }
        }
        for id in &marker_plan.create {
            if let Some(summary) = incoming.get(id) {
                let handle = self.surface.create_marker(summary);
                overlays.by_handle.insert(handle, id.clone());
                overlays
                    .markers
                    .insert(id.clone(), (handle, (*summary).clone()));
                diff.created.push((id.clone(), handle));
            }
        }

        debug!(
            created = diff.created.len(),
            destroyed = diff.destroyed.len(),
            kept = diff.kept.len(),
            "markers reconciled"
        );
        diff
    }

    /// Remove every place marker; returns how many were removed.
    #[expect(
        clippy::must_use_candidate,
        reason = "the count is informational; the map calls are the effect"
    )]
    pub fn clear_markers(&self) -> usize {
        let mut overlays = lock(&self.overlays);
        let removed = overlays.markers.len();
        for (handle, _) in overlays.markers.values() {
            self.surface.remove_marker(*handle);
        }
        overlays.markers.clear();
        overlays.by_handle.clear();
        if removed > 0 {
            debug!(removed, "markers cleared");
        }
        removed
    }

    /// Number of place markers drawn.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        lock(&self.overlays).markers.len()
    }

    /// Handle of the marker drawn for `id`.
    #[must_use]
    pub fn handle_for(&self, id: &PlaceId) -> Option<MarkerHandle> {
        lock(&self.overlays).markers.get(id).map(|(handle, _)| *handle)
    }

    /// Summary behind a clicked marker; unknown handles yield `None`.
    #[must_use]
    pub fn marker_clicked(&self, handle: MarkerHandle) -> Option<PlaceSummary> {
        let overlays = lock(&self.overlays);
        let id = overlays.by_handle.get(&handle)?;
        overlays
            .markers
            .get(id)
            .map(|(_, summary)| summary.clone())
    }

    /// Draw or move the user-location marker for a device-derived center.
    ///
    /// A manual center removes the marker instead.
    pub fn show_user_location(&self, center: &Center) {
        if !center.from_device {
            self.clear_user_location();
            return;
        }
        let accuracy = center.accuracy_metres.unwrap_or(0.0);
        let mut overlays = lock(&self.overlays);
        if let Some(handle) = overlays.user_location {
            self.surface
                .move_user_location(handle, center.coordinate, accuracy);
            return;
        }
        let handle = self
            .surface
            .place_user_location(center.coordinate, accuracy);
        overlays.user_location = Some(handle);
    }

    /// Remove the user-location marker and accuracy circle, if drawn.
    pub fn clear_user_location(&self) {
        if let Some(handle) = lock(&self.overlays).user_location.take() {
            self.surface.remove_user_location(handle);
        }
    }

    /// Return whether the user-location marker is drawn.
    #[must_use]
    pub fn has_user_location(&self) -> bool {
        lock(&self.overlays).user_location.is_some()
    }

    /// Draw `route` on the single route overlay and fit the viewport to it.
    pub fn show_route(&self, route: &Route) {
        let mut overlays = lock(&self.overlays);
        self.surface.render_route(route);
        self.surface.fit_bounds(route.bounds);
        overlays.route_visible = true;
    }

    /// Remove the route overlay, if drawn.
    pub fn clear_route(&self) {
        let mut overlays = lock(&self.overlays);
        if overlays.route_visible {
            self.surface.clear_route();
            overlays.route_visible = false;
        }
    }

    /// Return whether a route is drawn.
    #[must_use]
    pub fn has_route(&self) -> bool {
        lock(&self.overlays).route_visible
    }

    /// Center the viewport on a new map center.
    pub fn pan_to(&self, coordinate: Coordinate) {
        self.surface.pan_to(coordinate);
    }

    /// Pan to a selected place; zoom in unless the layout is compact.
    pub fn focus(&self, coordinate: Coordinate) {
        self.surface.pan_to(coordinate);
        if !self.surface.is_compact() {
            self.surface.set_zoom(SELECTION_ZOOM);
        }
    }

    /// Release every overlay.
    pub fn teardown(&self) {
        self.clear_markers();
        self.clear_user_location();
        self.clear_route();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::{MockMapSurface, Route};
    use crate::domain::{Bounds, Center};
    use crate::test_support::fixtures::{coordinate, place_id, summary};
    use crate::test_support::map::{MapEvent, RecordingMapSurface};

    #[fixture]
    fn surface() -> Arc<RecordingMapSurface> {
        Arc::new(RecordingMapSurface::new())
    }

    fn reconciler(surface: &Arc<RecordingMapSurface>) -> MarkerReconciler {
        MarkerReconciler::new(Arc::clone(surface) as Arc<dyn MapSurface>)
    }

    fn summaries(ids: &[&str]) -> Vec<PlaceSummary> {
        ids.iter().map(|id| summary(id)).collect()
    }

    #[rstest]
    #[case(&[], &["a", "b"], &["a", "b"], &[], &[])]
    #[case(&["a", "b"], &[], &[], &["a", "b"], &[])]
    #[case(&["a", "b"], &["b", "a"], &[], &[], &["b", "a"])]
    #[case(&["1", "2", "3"], &["2", "3", "4"], &["4"], &["1"], &["2", "3"])]
    #[case(&["x"], &["y", "y"], &["y"], &["x"], &[])]
    fn plan_is_a_set_difference(
        #[case] current: &[&str],
        #[case] incoming: &[&str],
        #[case] create: &[&str],
        #[case] destroy: &[&str],
        #[case] keep: &[&str],
    ) {
        let drawn: Vec<PlaceId> = current.iter().map(|id| place_id(id)).collect();
        let ids = |raw: &[&str]| raw.iter().map(|id| place_id(id)).collect::<Vec<_>>();

        let result = plan(&drawn, &summaries(incoming));

        assert_eq!(result.create, ids(create));
        assert_eq!(result.destroy, ids(destroy));
        assert_eq!(result.keep, ids(keep));
    }

    #[rstest]
    fn reconcile_keeps_shared_handles_stable(surface: Arc<RecordingMapSurface>) {
        let reconciler = reconciler(&surface);
        reconciler.reconcile(&summaries(&["1", "2", "3"]));
        let before_2 = reconciler.handle_for(&place_id("2"));
        let before_3 = reconciler.handle_for(&place_id("3"));
        surface.clear_events();

        let diff = reconciler.reconcile(&summaries(&["2", "3", "4"]));

        assert_eq!(diff.created.len(), 1);
        assert_eq!(diff.destroyed.len(), 1);
        assert_eq!(
            diff.destroyed.first().map(|(id, _)| id.as_str()),
            Some("1")
        );
        assert_eq!(reconciler.handle_for(&place_id("2")), before_2);
        assert_eq!(reconciler.handle_for(&place_id("3")), before_3);
        let created = surface
            .events()
            .iter()
            .filter(|event| matches!(event, MapEvent::MarkerCreated(..)))
            .count();
        let removed = surface
            .events()
            .iter()
            .filter(|event| matches!(event, MapEvent::MarkerRemoved(_)))
            .count();
        assert_eq!((created, removed), (1, 1));
        assert_eq!(surface.live_markers().len(), 3);
    }

    #[rstest]
    fn marker_click_returns_the_summary(surface: Arc<RecordingMapSurface>) {
        let reconciler = reconciler(&surface);
        let diff = reconciler.reconcile(&summaries(&["a", "b"]));
        let (_, handle) = diff.created.last().cloned().expect("marker drawn");

        let clicked = reconciler.marker_clicked(handle).expect("known marker");

        assert_eq!(clicked.id.as_str(), "b");
        assert!(reconciler.marker_clicked(MarkerHandle(9_999)).is_none());
    }

    #[rstest]
    fn clear_markers_removes_everything(surface: Arc<RecordingMapSurface>) {
        let reconciler = reconciler(&surface);
        reconciler.reconcile(&summaries(&["a", "b", "c"]));

        assert_eq!(reconciler.clear_markers(), 3);
        assert_eq!(reconciler.marker_count(), 0);
        assert!(surface.live_markers().is_empty());
    }

    #[rstest]
    fn user_location_is_created_once_then_moved(surface: Arc<RecordingMapSurface>) {
        let reconciler = reconciler(&surface);
        let first = Center::from_device(coordinate(26.85, 80.94), 25.0);
        let second = Center::from_device(coordinate(26.86, 80.95), 12.0);

        reconciler.show_user_location(&first);
        reconciler.show_user_location(&second);
        reconciler.show_user_location(&Center::manual(coordinate(26.9, 80.9)));

        let events = surface.events();
        assert!(matches!(
            events.as_slice(),
            [
                MapEvent::UserLocationPlaced(placed, _),
                MapEvent::UserLocationMoved(moved, _),
                MapEvent::UserLocationRemoved(removed),
            ] if placed == moved && moved == removed
        ));
        assert!(!reconciler.has_user_location());
    }

    #[rstest]
    fn route_overlay_is_reused_and_fits_the_viewport(surface: Arc<RecordingMapSurface>) {
        let reconciler = reconciler(&surface);
        let path = vec![coordinate(26.84, 80.94), coordinate(26.85, 80.95)];
        let bounds = Bounds::enclosing(&path).expect("bounds");
        let route = Route {
            path,
            distance_metres: 1_400,
            duration_secs: 1_080,
            bounds,
        };

        reconciler.show_route(&route);
        reconciler.show_route(&route);
        reconciler.clear_route();
        reconciler.clear_route();

        assert_eq!(
            surface.events(),
            vec![
                MapEvent::RouteRendered(2),
                MapEvent::Fitted(bounds),
                MapEvent::RouteRendered(2),
                MapEvent::Fitted(bounds),
                MapEvent::RouteCleared,
            ]
        );
    }

    #[rstest]
    #[case(false, true)]
    #[case(true, false)]
    fn focus_zooms_only_on_wide_layouts(#[case] compact: bool, #[case] zooms: bool) {
        let mut surface = MockMapSurface::new();
        surface.expect_pan_to().times(1).return_const(());
        surface.expect_is_compact().return_const(compact);
        surface
            .expect_set_zoom()
            .withf(|zoom| *zoom == SELECTION_ZOOM)
            .times(usize::from(zooms))
            .return_const(());
        let reconciler = MarkerReconciler::new(Arc::new(surface));

        reconciler.focus(coordinate(26.85, 80.95));
    }

    #[rstest]
    fn teardown_releases_every_overlay(surface: Arc<RecordingMapSurface>) {
        let reconciler = reconciler(&surface);
        reconciler.reconcile(&summaries(&["a", "b"]));
        reconciler.show_user_location(&Center::from_device(coordinate(26.85, 80.94), 8.0));
        let path = vec![coordinate(26.84, 80.94), coordinate(26.85, 80.95)];
        let bounds = Bounds::enclosing(&path).expect("bounds");
        reconciler.show_route(&Route {
            path,
            distance_metres: 900,
            duration_secs: 700,
            bounds,
        });

        reconciler.teardown();

        assert!(surface.live_markers().is_empty());
        assert!(surface.user_location().is_none());
        assert!(!surface.route_visible());
    }
}
