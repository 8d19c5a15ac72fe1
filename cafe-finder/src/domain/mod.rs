//! Domain primitives and the search-and-selection coordination layer.
//!
//! Purpose: turn (center, category, filters, free-text query) into a
//! deduplicated, filtered, capped list of places; resolve details on
//! selection; keep the map's markers in step with the results.
//!
//! Public surface:
//! - [`QueryCoordinator`] runs nearby searches and debounced suggestions.
//! - [`DetailResolver`] resolves, caches, and coalesces place details.
//! - [`MarkerReconciler`] owns every map overlay and diffs markers.
//! - [`Selection`], [`Locator`], [`DirectionsCoordinator`] cover the
//!   selection slot, geolocation, and walking directions.
//! - [`ExplorerSession`] wires them together behind [`UserIntent`] dispatch.

use std::sync::{Mutex, MutexGuard, PoisonError};

mod debounce;
mod detail_resolver;
mod directions;
pub mod error;
mod filters;
mod generation;
mod geo;
mod locator;
mod marker_reconciler;
pub mod normalize;
mod place;
pub mod ports;
mod query_coordinator;
mod selection;
mod session;

pub use self::debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use self::detail_resolver::{DETAIL_FIELDS, DetailResolver};
pub use self::directions::DirectionsCoordinator;
pub use self::error::{FinderError, MISSING_KEY_BANNER, Notice, NoticeLevel};
pub use self::filters::{
    Category, DEFAULT_LOCATION, DEFAULT_RADIUS_METRES, FilterState, MAX_RADIUS_METRES,
    MAX_RESULTS, MIN_RADIUS_METRES, UnknownCategory,
};
pub use self::generation::{GenerationTicket, RequestGeneration};
pub use self::geo::{Bounds, Center, Coordinate, CoordinateValidationError};
pub use self::locator::{GEOLOCATION_TIMEOUT, Locator};
pub use self::marker_reconciler::{
    MarkerDiff, MarkerPlan, MarkerReconciler, SELECTION_ZOOM, plan,
};
pub use self::place::{
    BusinessStatus, OpeningHours, PhotoRef, PhotoToken, PlaceDetail, PlaceId,
    PlaceIdValidationError, PlaceSummary, Review, SelectedPlace, Suggestion,
};
pub use self::ports::Route;
pub use self::query_coordinator::{
    PlaceResults, QueryCoordinator, ResultsState, SUGGESTION_LIMIT, SearchOutcome,
    SuggestOutcome, refine_results,
};
pub use self::selection::{Selection, SelectionTicket};
pub use self::session::{
    DETAIL_PHOTO_LIMIT, DETAIL_REVIEW_LIMIT, ExplorerSession, SessionConfig, SessionPorts,
    UserIntent, ViewState,
};

/// Lock a state mutex, recovering the data if a previous holder panicked.
///
/// Guards in this crate are never held across `.await` and every critical
/// section leaves the data consistent, so a poisoned lock is still usable.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
