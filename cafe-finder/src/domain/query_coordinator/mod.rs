//! Nearby search and free-text suggestions.
//!
//! Every search takes a ticket from a [`RequestGeneration`]. The provider
//! future races the ticket's supersession, so starting a newer search drops
//! the older request at the transport level and its completion never reaches
//! the visible [`ResultsState`]. Suggestions run the same way behind a
//! [`Debouncer`].

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::normalize::{normalize_suggestion, normalize_summary};
use super::ports::{
    NearbySearchRequest, PROVIDER_PAGE_SIZE, PlacesProvider, RawPlace, TextSearchRequest,
};
use super::{
    Category, Center, Coordinate, Debouncer, FilterState, FinderError, MAX_RESULTS,
    PlaceSummary, RequestGeneration, Suggestion, lock,
};

/// Most suggestions shown under the search box.
pub const SUGGESTION_LIMIT: usize = 5;

/// Finite, single-pass sequence of search results.
///
/// The sequence cannot be restarted; issue a new search for new inputs.
#[derive(Debug)]
pub struct PlaceResults(std::vec::IntoIter<PlaceSummary>);

impl Iterator for PlaceResults {
    type Item = PlaceSummary;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for PlaceResults {}

/// Completion of one [`QueryCoordinator::search`] call.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Results were applied to the visible state.
    Results(PlaceResults),
    /// The filtered result set is empty; a valid state, not an error.
    Empty,
    /// A newer search started first; nothing was applied.
    Superseded,
}

/// Completion of one [`QueryCoordinator::suggest`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestOutcome {
    /// Suggestions were applied to the visible list.
    Suggestions(Vec<Suggestion>),
    /// Blank input cleared the list without a provider call.
    Cleared,
    /// A newer keystroke arrived first; nothing was applied.
    Superseded,
}

/// Results state rendered by the list view.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultsState {
    /// No search has run yet.
    #[default]
    Idle,
    /// A search is in flight.
    Loading,
    /// Results of the latest search.
    Ready(Vec<PlaceSummary>),
    /// The latest search matched nothing after filtering.
    Empty,
    /// The latest search failed.
    Failed(FinderError),
}

/// Apply de-duplication, filters, and the result cap to a raw batch.
///
/// Malformed records are logged and skipped. The first record for an
/// identifier wins.
///
/// # Examples
/// ```
/// use cafe_finder::domain::{FilterState, refine_results};
/// use cafe_finder::domain::ports::RawPlace;
/// use serde_json::json;
///
/// let raw = vec![
///     RawPlace(json!({"id": "a", "displayName": {"text": "A"},
///         "location": {"latitude": 26.85, "longitude": 80.95}, "rating": 4.6})),
///     RawPlace(json!({"id": "b", "displayName": {"text": "B"},
///         "location": {"latitude": 26.85, "longitude": 80.95}, "rating": 3.1})),
/// ];
/// let filters = FilterState { min_rating: 4.0, ..FilterState::default() };
/// let kept = refine_results(&raw, &filters);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].id.as_str(), "a");
/// ```
#[must_use]
pub fn refine_results(raw: &[RawPlace], filters: &FilterState) -> Vec<PlaceSummary> {
    let mut seen = HashSet::new();
    raw.iter()
        .filter_map(|record| {
            normalize_summary(record.as_value())
                .inspect_err(|error| warn!(%error, "skipping malformed place record"))
                .ok()
        })
        .filter(|summary| seen.insert(summary.id.clone()))
        .filter(|summary| filters.admits_rating(summary.rating))
        .filter(|summary| filters.admits_open_state(summary.open_now))
        .take(MAX_RESULTS)
        .collect()
}

/// Coordinates nearby searches and debounced suggestions.
pub struct QueryCoordinator {
    provider: Arc<dyn PlacesProvider>,
    searches: RequestGeneration,
    debouncer: Debouncer,
    state: Mutex<ResultsState>,
    suggestions: Mutex<Vec<Suggestion>>,
}

impl QueryCoordinator {
    /// Build a coordinator with the default suggestion debounce.
    #[must_use]
    pub fn new(provider: Arc<dyn PlacesProvider>) -> Self {
        Self::with_debouncer(provider, Debouncer::default())
    }

    /// Build a coordinator with an explicit suggestion debouncer.
    #[must_use]
    pub fn with_debouncer(provider: Arc<dyn PlacesProvider>, debouncer: Debouncer) -> Self {
        Self {
            provider,
            searches: RequestGeneration::new(),
            debouncer,
            state: Mutex::new(ResultsState::Idle),
            suggestions: Mutex::new(Vec::new()),
        }
    }

    /// Search for `category` places around `center`.
    ///
    /// The radius is clamped into the supported range. Only the most recently
    /// started search updates [`Self::state`]; an overtaken call returns
    /// [`SearchOutcome::Superseded`] as soon as the newer one begins.
    ///
    /// # Errors
    /// Returns [`FinderError::QueryFailed`] when the provider call fails or
    /// the client is not initialised. The failure is also recorded in
    /// [`Self::state`].
    pub async fn search(
        &self,
        center: Coordinate,
        category: Category,
        filters: FilterState,
    ) -> Result<SearchOutcome, FinderError> {
        let ticket = self.searches.begin();
        *lock(&self.state) = ResultsState::Loading;

        let request = NearbySearchRequest {
            center,
            radius_metres: filters.effective_radius(),
            included_type: category,
            max_results: PROVIDER_PAGE_SIZE,
        };
        debug!(
            generation = ticket.id(),
            %category,
            radius_metres = request.radius_metres,
            "nearby search issued"
        );

        let response = tokio::select! {
            biased;
            () = ticket.superseded() => {
                debug!(generation = ticket.id(), "nearby search superseded in flight");
                return Ok(SearchOutcome::Superseded);
            }
            response = self.provider.nearby_search(&request) => response,
        };

        let mut state = lock(&self.state);
        if !ticket.is_current() {
            debug!(generation = ticket.id(), "discarding stale nearby search");
            return Ok(SearchOutcome::Superseded);
        }
        let raw = response.map_err(|error| {
            warn!(generation = ticket.id(), %error, "nearby search failed");
            let failure = FinderError::query_failed(&error);
            *state = ResultsState::Failed(failure.clone());
            failure
        })?;
        let summaries = refine_results(&raw, &filters);
        debug!(
            generation = ticket.id(),
            received = raw.len(),
            kept = summaries.len(),
            "nearby search applied"
        );
        if summaries.is_empty() {
            *state = ResultsState::Empty;
            return Ok(SearchOutcome::Empty);
        }
        *state = ResultsState::Ready(summaries.clone());
        Ok(SearchOutcome::Results(PlaceResults(summaries.into_iter())))
    }

    /// Snapshot of the visible results state.
    #[must_use]
    pub fn state(&self) -> ResultsState {
        lock(&self.state).clone()
    }

    /// Summaries currently shown, empty unless the state is `Ready`.
    #[must_use]
    pub fn results(&self) -> Vec<PlaceSummary> {
        match &*lock(&self.state) {
            ResultsState::Ready(summaries) => summaries.clone(),
            _ => Vec::new(),
        }
    }

    /// Fetch suggestions for `text` once typing pauses.
    ///
    /// Each call restarts the quiet window; only the last keystroke inside it
    /// reaches the provider. A keystroke arriving while that call is in flight
    /// drops it. Blank text clears the list immediately.
    ///
    /// # Errors
    /// Returns [`FinderError::QueryFailed`] when the provider call fails; the
    /// list is cleared in that case.
    pub async fn suggest(&self, text: &str) -> Result<SuggestOutcome, FinderError> {
        let query = text.trim();
        if query.is_empty() {
            self.debouncer.cancel();
            lock(&self.suggestions).clear();
            return Ok(SuggestOutcome::Cleared);
        }

        let Some(ticket) = self.debouncer.schedule().await else {
            return Ok(SuggestOutcome::Superseded);
        };

        let request = TextSearchRequest {
            query: query.to_owned(),
            max_results: u32::try_from(SUGGESTION_LIMIT).unwrap_or(PROVIDER_PAGE_SIZE),
        };
        debug!(generation = ticket.id(), query, "suggestion search issued");
        let response = tokio::select! {
            biased;
            () = ticket.superseded() => return Ok(SuggestOutcome::Superseded),
            response = self.provider.text_search(&request) => response,
        };

        let mut suggestions = lock(&self.suggestions);
        if !ticket.is_current() {
            return Ok(SuggestOutcome::Superseded);
        }
        let raw = response.map_err(|error| {
            warn!(%error, "suggestion search failed");
            suggestions.clear();
            FinderError::query_failed(&error)
        })?;
        let fresh: Vec<Suggestion> = raw
            .iter()
            .filter_map(|record| normalize_suggestion(record.as_value()).ok())
            .take(SUGGESTION_LIMIT)
            .collect();
        suggestions.clone_from(&fresh);
        Ok(SuggestOutcome::Suggestions(fresh))
    }

    /// Suggestions currently listed under the search box.
    #[must_use]
    pub fn suggestions(&self) -> Vec<Suggestion> {
        lock(&self.suggestions).clone()
    }

    /// First listed suggestion, used by the "Go" action.
    #[must_use]
    pub fn first_suggestion(&self) -> Option<Suggestion> {
        lock(&self.suggestions).first().cloned()
    }

    /// Take the suggestion at `index` as the new center and clear the list.
    ///
    /// Any pending suggestion call is retired so it cannot refill the list.
    #[must_use]
    pub fn choose_suggestion(&self, index: usize) -> Option<Center> {
        let mut suggestions = lock(&self.suggestions);
        let chosen = suggestions.get(index).map(|s| Center::manual(s.coordinate))?;
        suggestions.clear();
        self.debouncer.cancel();
        Some(chosen)
    }

    /// Clear the suggestion list and retire any pending suggestion call.
    pub fn clear_suggestions(&self) {
        self.debouncer.cancel();
        lock(&self.suggestions).clear();
    }

    /// Retire every in-flight search and suggestion.
    pub fn cancel_all(&self) {
        self.searches.invalidate();
        self.debouncer.cancel();
    }
}
