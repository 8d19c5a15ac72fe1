//! Port for the process-wide place-detail store.
//!
//! Callers only see `get`/`put`/`contains`, so the store can be bounded or
//! swapped without touching the resolver.

use crate::domain::{PlaceDetail, PlaceId};

/// Key-value store of resolved details keyed by place identifier.
#[cfg_attr(test, mockall::automock)]
pub trait DetailsCache: Send + Sync {
    /// Look up a resolved detail.
    fn get(&self, id: &PlaceId) -> Option<PlaceDetail>;

    /// Store a resolved detail; last writer wins.
    fn put(&self, detail: PlaceDetail);

    /// Return whether a detail is stored for `id`.
    fn contains(&self, id: &PlaceId) -> bool;
}
