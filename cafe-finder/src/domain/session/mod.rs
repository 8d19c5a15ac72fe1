//! Application-level explorer state driven by user intents.
//!
//! The session owns the inputs the presentation layer edits (category,
//! filters, center) and routes each [`UserIntent`] to the query coordinator,
//! detail resolver, marker reconciler, locator, and directions coordinator.
//! Every failure ends up as view state or a one-shot [`Notice`]; dispatch
//! never fails.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info};

use super::ports::{
    DetailsCache, DirectionsProvider, Geolocation, MapSurface, MarkerHandle, PlacesProvider,
};
use super::{
    Category, Center, DEFAULT_DEBOUNCE, DEFAULT_LOCATION, Debouncer, DetailResolver,
    DirectionsCoordinator, FilterState, FinderError, GEOLOCATION_TIMEOUT, Locator,
    MarkerReconciler, Notice, PlaceSummary, QueryCoordinator, ResultsState, SearchOutcome,
    SelectedPlace, Selection, Suggestion, lock,
};

/// Photos shown in the detail view's photo strip.
pub const DETAIL_PHOTO_LIMIT: usize = 6;
/// Reviews shown under "Top reviews".
pub const DETAIL_REVIEW_LIMIT: usize = 3;

/// Outbound adapters a session drives.
pub struct SessionPorts {
    /// Places search and details.
    pub places: Arc<dyn PlacesProvider>,
    /// Route computation.
    pub directions: Arc<dyn DirectionsProvider>,
    /// Device position.
    pub geolocation: Arc<dyn Geolocation>,
    /// Detail store.
    pub cache: Arc<dyn DetailsCache>,
    /// Map widget.
    pub map: Arc<dyn MapSurface>,
}

impl SessionPorts {
    /// Build a strongly-typed session port bundle.
    #[must_use]
    pub const fn new(
        places: Arc<dyn PlacesProvider>,
        directions: Arc<dyn DirectionsProvider>,
        geolocation: Arc<dyn Geolocation>,
        cache: Arc<dyn DetailsCache>,
        map: Arc<dyn MapSurface>,
    ) -> Self {
        Self {
            places,
            directions,
            geolocation,
            cache,
            map,
        }
    }
}

/// Tunables for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Suggestion quiet window.
    pub debounce: Duration,
    /// Longest wait for a position fix.
    pub geolocation_timeout: Duration,
    /// Whether the places client initialised; `false` shows the banner.
    pub provider_ready: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            geolocation_timeout: GEOLOCATION_TIMEOUT,
            provider_ready: true,
        }
    }
}

/// Event emitted by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UserIntent {
    /// Switch navigation tab.
    SelectCategory(Category),
    /// Radius, open-now, or minimum-rating change.
    ChangeFilters(FilterState),
    /// Map dragged or recentered.
    ChangeCenter(Center),
    /// Search box keystroke.
    TypeQuery(String),
    /// Suggestion picked from the list.
    ChooseSuggestion(usize),
    /// "Go" pressed: take the first suggestion.
    SubmitQuery,
    /// Locate button pressed.
    Locate,
    /// Place picked from the list.
    SelectPlace(PlaceSummary),
    /// Marker clicked on the map.
    MarkerClicked(MarkerHandle),
    /// Directions requested from the detail view.
    RequestDirections,
    /// Detail view closed.
    CloseDetails,
}

/// Snapshot consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Active category tab.
    pub category: Category,
    /// Current filters.
    pub filters: FilterState,
    /// Current map center.
    pub center: Center,
    /// Results list state.
    pub results: ResultsState,
    /// Suggestions under the search box.
    pub suggestions: Vec<Suggestion>,
    /// Inline error under the search box.
    pub suggestion_error: Option<FinderError>,
    /// Place in the detail view.
    pub selected: Option<SelectedPlace>,
    /// Inline error in the detail view.
    pub detail_error: Option<FinderError>,
    /// Persistent warning banner.
    pub banner: Option<String>,
    /// Whether a walking route is drawn.
    pub route_shown: bool,
    /// Undrained one-shot notifications.
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Copy)]
struct Inputs {
    category: Category,
    filters: FilterState,
    center: Center,
}

/// Explorer state machine behind the presentation layer.
pub struct ExplorerSession {
    inputs: Mutex<Inputs>,
    queries: QueryCoordinator,
    resolver: DetailResolver,
    reconciler: Arc<MarkerReconciler>,
    selection: Selection,
    locator: Arc<Locator>,
    directions: DirectionsCoordinator,
    notices: Mutex<Vec<Notice>>,
    suggestion_error: Mutex<Option<FinderError>>,
    banner: Option<String>,
    torn_down: AtomicBool,
}

impl ExplorerSession {
    /// Session with default tunables, centered on [`DEFAULT_LOCATION`].
    #[must_use]
    pub fn new(ports: SessionPorts) -> Self {
        Self::with_config(ports, SessionConfig::default())
    }

    /// Session with explicit tunables.
    #[must_use]
    pub fn with_config(ports: SessionPorts, config: SessionConfig) -> Self {
        let SessionPorts {
            places,
            directions,
            geolocation,
            cache,
            map,
        } = ports;
        let reconciler = Arc::new(MarkerReconciler::new(map));
        let locator = Arc::new(Locator::with_timeout(
            geolocation,
            config.geolocation_timeout,
        ));
        let banner = (!config.provider_ready).then(|| {
            info!("places client not initialised; search disabled");
            FinderError::InitializationFailed.to_string()
        });
        Self {
            inputs: Mutex::new(Inputs {
                category: Category::default(),
                filters: FilterState::default(),
                center: Center::manual(DEFAULT_LOCATION),
            }),
            queries: QueryCoordinator::with_debouncer(
                Arc::clone(&places),
                Debouncer::new(config.debounce),
            ),
            resolver: DetailResolver::new(places, cache),
            directions: DirectionsCoordinator::new(
                Arc::clone(&locator),
                directions,
                Arc::clone(&reconciler),
            ),
            reconciler,
            selection: Selection::new(),
            locator,
            notices: Mutex::new(Vec::new()),
            suggestion_error: Mutex::new(None),
            banner,
            torn_down: AtomicBool::new(false),
        }
    }

    /// Run the initial search for the default inputs.
    pub async fn start(&self) {
        self.refresh(false).await;
    }

    /// Apply one user intent.
    pub async fn dispatch(&self, intent: UserIntent) {
        if self.is_torn_down() {
            debug!(?intent, "ignoring intent after teardown");
            return;
        }
        match intent {
            UserIntent::SelectCategory(category) => self.select_category(category).await,
            UserIntent::ChangeFilters(filters) => {
                lock(&self.inputs).filters = filters.normalised();
                self.refresh(false).await;
            }
            UserIntent::ChangeCenter(center) => self.change_center(center).await,
            UserIntent::TypeQuery(text) => self.type_query(&text).await,
            UserIntent::ChooseSuggestion(index) => self.choose_suggestion(index).await,
            UserIntent::SubmitQuery => self.choose_suggestion(0).await,
            UserIntent::Locate => self.locate().await,
            UserIntent::SelectPlace(summary) => self.select_place(summary).await,
            UserIntent::MarkerClicked(handle) => {
                let Some(summary) = self.reconciler.marker_clicked(handle) else {
                    debug!(%handle, "click on unknown marker");
                    return;
                };
                self.select_place(summary).await;
            }
            UserIntent::RequestDirections => self.request_directions().await,
            UserIntent::CloseDetails => self.selection.close(),
        }
    }

    /// Current view snapshot; notices stay queued.
    #[must_use]
    pub fn view(&self) -> ViewState {
        let inputs = *lock(&self.inputs);
        ViewState {
            category: inputs.category,
            filters: inputs.filters,
            center: inputs.center,
            results: self.queries.state(),
            suggestions: self.queries.suggestions(),
            suggestion_error: lock(&self.suggestion_error).clone(),
            selected: self.selection.selected(),
            detail_error: self.selection.error(),
            banner: self.banner.clone(),
            route_shown: self.reconciler.has_route(),
            notices: lock(&self.notices).clone(),
        }
    }

    /// Take every queued notice.
    #[must_use]
    pub fn drain_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *lock(&self.notices))
    }

    /// Summaries currently listed and drawn.
    #[must_use]
    pub fn results(&self) -> Vec<PlaceSummary> {
        self.queries.results()
    }

    /// Handle of the marker drawn for a listed place.
    #[must_use]
    pub fn marker_for(&self, summary: &PlaceSummary) -> Option<MarkerHandle> {
        self.reconciler.handle_for(&summary.id)
    }

    /// Cancel pending work and release every map resource.
    ///
    /// Later intents are ignored; in-flight work completes as a no-op.
    pub fn teardown(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.queries.cancel_all();
        self.selection.close();
        self.directions.cancel();
        self.reconciler.teardown();
        debug!("explorer session torn down");
    }

    async fn refresh(&self, clear_markers: bool) {
        if self.is_torn_down() {
            return;
        }
        let inputs = *lock(&self.inputs);
        if clear_markers {
            self.reconciler.clear_markers();
        }
        let outcome = self
            .queries
            .search(inputs.center.coordinate, inputs.category, inputs.filters)
            .await;
        if self.is_torn_down() {
            return;
        }
        match outcome {
            Ok(SearchOutcome::Results(results)) => {
                let summaries: Vec<PlaceSummary> = results.collect();
                self.reconciler.reconcile(&summaries);
            }
            Ok(SearchOutcome::Empty) | Err(_) => {
                self.reconciler.reconcile(&[]);
            }
            Ok(SearchOutcome::Superseded) => {}
        }
    }

    async fn select_category(&self, category: Category) {
        let changed = {
            let mut inputs = lock(&self.inputs);
            let differs = inputs.category != category;
            inputs.category = category;
            differs
        };
        self.refresh(changed).await;
    }

    async fn change_center(&self, center: Center) {
        if self.is_torn_down() {
            return;
        }
        lock(&self.inputs).center = center;
        self.reconciler.pan_to(center.coordinate);
        self.reconciler.show_user_location(&center);
        self.refresh(false).await;
    }

    async fn type_query(&self, text: &str) {
        let outcome = self.queries.suggest(text).await;
        if self.is_torn_down() {
            return;
        }
        *lock(&self.suggestion_error) = outcome.err();
    }

    async fn choose_suggestion(&self, index: usize) {
        let Some(center) = self.queries.choose_suggestion(index) else {
            debug!(index, "no suggestion to choose");
            return;
        };
        self.change_center(center).await;
    }

    async fn locate(&self) {
        let located = self.locator.locate().await;
        if self.is_torn_down() {
            debug!("discarding position fix after teardown");
            return;
        }
        let Ok(center) = located.inspect_err(|error| self.notify(error)) else {
            return;
        };
        self.change_center(center).await;
    }

    async fn select_place(&self, summary: PlaceSummary) {
        let id = summary.id.clone();
        self.reconciler.focus(summary.coordinate);
        let ticket = self.selection.select(summary);
        let resolution = self.resolver.resolve(&id).await;
        if !self.selection.apply(&ticket, resolution) {
            debug!(%id, "selection moved on before the detail arrived");
        }
    }

    async fn request_directions(&self) {
        let Some(selected) = self.selection.selected() else {
            lock(&self.notices).push(Notice::info("Select a place first."));
            return;
        };
        if let Err(error) = self.directions.request(selected.coordinate()).await {
            self.notify(&error);
        }
    }

    fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    fn notify(&self, error: &FinderError) {
        lock(&self.notices).push(Notice::from_error(error));
    }
}
