//! The "selected place" slot shown in the detail view.
//!
//! Selecting stores the summary immediately and hands back a ticket. A
//! resolution only lands if its ticket is still current, so closing the view
//! or selecting another place turns a late resolution into a no-op.

use std::sync::Mutex;

use tracing::debug;

use super::{
    FinderError, GenerationTicket, PlaceDetail, PlaceId, PlaceSummary, RequestGeneration,
    SelectedPlace, lock,
};

/// Proof that a selection was the latest when it was made.
#[derive(Debug, Clone)]
pub struct SelectionTicket {
    ticket: GenerationTicket,
    id: PlaceId,
}

impl SelectionTicket {
    /// Place this ticket was issued for.
    #[must_use]
    pub const fn place_id(&self) -> &PlaceId {
        &self.id
    }

    /// Return whether the selection is still open and unchanged.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.ticket.is_current()
    }

    /// Resolve once the selection changes or the view closes.
    pub async fn superseded(&self) {
        self.ticket.superseded().await;
    }
}

#[derive(Debug, Default)]
struct Slot {
    selected: Option<SelectedPlace>,
    error: Option<FinderError>,
}

/// Single evolving selection reference.
#[derive(Debug, Default)]
pub struct Selection {
    generation: RequestGeneration,
    slot: Mutex<Slot>,
}

impl Selection {
    /// Empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `summary`, superseding any earlier selection.
    #[must_use]
    pub fn select(&self, summary: PlaceSummary) -> SelectionTicket {
        let ticket = self.generation.begin();
        let id = summary.id.clone();
        let mut slot = lock(&self.slot);
        slot.selected = Some(SelectedPlace::Summary(summary));
        slot.error = None;
        SelectionTicket { ticket, id }
    }

    /// Apply a detail resolution for `ticket`.
    ///
    /// Success replaces the summary with the detail; failure keeps the summary
    /// and records the error. Returns `false` without touching anything when
    /// the ticket is stale.
    #[must_use]
    pub fn apply(
        &self,
        ticket: &SelectionTicket,
        resolution: Result<PlaceDetail, FinderError>,
    ) -> bool {
        let mut slot = lock(&self.slot);
        if !ticket.is_current() {
            debug!(place_id = %ticket.id, "dropping resolution for a closed selection");
            return false;
        }
        slot.error = resolution.as_ref().err().cloned();
        if let Ok(detail) = resolution {
            slot.selected = Some(SelectedPlace::Detail(detail));
        }
        true
    }

    /// Close the detail view: clear the slot and retire outstanding tickets.
    pub fn close(&self) {
        self.generation.invalidate();
        let mut slot = lock(&self.slot);
        slot.selected = None;
        slot.error = None;
    }

    /// Currently selected place.
    #[must_use]
    pub fn selected(&self) -> Option<SelectedPlace> {
        lock(&self.slot).selected.clone()
    }

    /// Error from the latest resolution of the current selection.
    #[must_use]
    pub fn error(&self) -> Option<FinderError> {
        lock(&self.slot).error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalize::normalize_detail;
    use crate::test_support::fixtures::{current_detail, place_id, summary};

    fn detail(id: &str) -> PlaceDetail {
        normalize_detail(current_detail(id, "Royal Cafe").as_value()).expect("fixture normalises")
    }

    #[test]
    fn resolution_replaces_the_summary() {
        let selection = Selection::new();
        let ticket = selection.select(summary("X"));
        assert!(matches!(selection.selected(), Some(SelectedPlace::Summary(_))));

        assert!(selection.apply(&ticket, Ok(detail("X"))));

        assert!(selection.selected().is_some_and(|place| place.is_resolved()));
    }

    #[test]
    fn failed_resolution_keeps_the_summary_visible() {
        let selection = Selection::new();
        let ticket = selection.select(summary("X"));
        let failure = FinderError::DetailFetchFailed {
            identifier: place_id("X"),
            reason: "timeout".to_owned(),
        };

        assert!(selection.apply(&ticket, Err(failure.clone())));

        assert!(matches!(selection.selected(), Some(SelectedPlace::Summary(_))));
        assert_eq!(selection.error(), Some(failure));
    }

    #[test]
    fn late_resolution_after_close_is_a_noop() {
        let selection = Selection::new();
        let ticket = selection.select(summary("X"));
        selection.close();

        assert!(!selection.apply(&ticket, Ok(detail("X"))));

        assert!(selection.selected().is_none());
        assert!(selection.error().is_none());
    }

    #[test]
    fn newer_selection_wins_over_an_older_resolution() {
        let selection = Selection::new();
        let stale = selection.select(summary("X"));
        let fresh = selection.select(summary("Y"));

        assert!(!selection.apply(&stale, Ok(detail("X"))));
        assert_eq!(
            selection.selected().map(|place| place.id().clone()),
            Some(place_id("Y"))
        );
        assert!(fresh.is_current());
    }
}
