//! One-shot walking directions from the device's current position.
//!
//! The origin is always a fresh fix taken when the request starts, never the
//! displayed map center. Failures leave place markers untouched.

use std::sync::Arc;

use tracing::{debug, warn};

use super::ports::{DirectionsProvider, Route, RouteRequest, TravelMode};
use super::{Center, Coordinate, FinderError, Locator, MarkerReconciler, RequestGeneration};

/// Requests, renders, and fits walking routes.
pub struct DirectionsCoordinator {
    locator: Arc<Locator>,
    provider: Arc<dyn DirectionsProvider>,
    reconciler: Arc<MarkerReconciler>,
    requests: RequestGeneration,
}

impl DirectionsCoordinator {
    /// Wire the coordinator to its collaborators.
    #[must_use]
    pub fn new(
        locator: Arc<Locator>,
        provider: Arc<dyn DirectionsProvider>,
        reconciler: Arc<MarkerReconciler>,
    ) -> Self {
        Self {
            locator,
            provider,
            reconciler,
            requests: RequestGeneration::new(),
        }
    }

    /// Route on foot from the current device position to `destination`.
    ///
    /// Returns `Ok(None)` when a newer request or [`Self::cancel`] overtook
    /// this one; nothing is drawn in that case.
    ///
    /// # Errors
    /// Returns [`FinderError::GeolocationFailed`] when no fix is available and
    /// [`FinderError::DirectionsFailed`] when the provider rejects the route.
    pub async fn request(&self, destination: Coordinate) -> Result<Option<Route>, FinderError> {
        let ticket = self.requests.begin();

        let located = tokio::select! {
            biased;
            () = ticket.superseded() => return Ok(None),
            outcome = self.locator.fix() => outcome,
        };
        if !ticket.is_current() {
            return Ok(None);
        }
        let fix = located?;
        self.reconciler
            .show_user_location(&Center::from_device(fix.coordinate, fix.accuracy_metres));

        let request = RouteRequest {
            origin: fix.coordinate,
            destination,
            mode: TravelMode::Walking,
        };
        let outcome = tokio::select! {
            biased;
            () = ticket.superseded() => return Ok(None),
            routed = self.provider.compute_route(&request) => routed,
        };

        if !ticket.is_current() {
            debug!("discarding directions outcome for a retired request");
            return Ok(None);
        }
        let route = outcome.map_err(|error| {
            warn!(%error, "directions request failed");
            FinderError::DirectionsFailed {
                status: error.status_code().to_owned(),
            }
        })?;
        debug!(
            distance_metres = route.distance_metres,
            duration_secs = route.duration_secs,
            "walking route rendered"
        );
        self.reconciler.show_route(&route);
        Ok(Some(route))
    }

    /// Retire any in-flight request.
    pub fn cancel(&self) {
        self.requests.invalidate();
    }
}
