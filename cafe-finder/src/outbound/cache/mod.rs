//! In-process stores implementing the `DetailsCache` port.
//!
//! [`InMemoryDetailsCache`] is the session default: unbounded, populated
//! lazily, never evicted. [`LruDetailsCache`] bounds memory by evicting the
//! least recently used entry once full.

use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroUsize;
use std::sync::Mutex;

use tracing::debug;

use crate::domain::ports::DetailsCache;
use crate::domain::{PlaceDetail, PlaceId, lock};

/// Unbounded session cache.
#[derive(Debug, Default)]
pub struct InMemoryDetailsCache {
    store: Mutex<HashMap<PlaceId, PlaceDetail>>,
}

impl InMemoryDetailsCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored details.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.store).len()
    }

    /// Return whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.store).is_empty()
    }
}

impl DetailsCache for InMemoryDetailsCache {
    fn get(&self, id: &PlaceId) -> Option<PlaceDetail> {
        lock(&self.store).get(id).cloned()
    }

    fn put(&self, detail: PlaceDetail) {
        lock(&self.store).insert(detail.id().clone(), detail);
    }

    fn contains(&self, id: &PlaceId) -> bool {
        lock(&self.store).contains_key(id)
    }
}

#[derive(Debug, Default)]
struct LruState {
    tick: u64,
    entries: HashMap<PlaceId, (u64, PlaceDetail)>,
    recency: BTreeMap<u64, PlaceId>,
}

impl LruState {
    fn touch(&mut self, id: &PlaceId) -> Option<&PlaceDetail> {
        self.tick += 1;
        let tick = self.tick;
        let (last_used, detail) = self.entries.get_mut(id)?;
        self.recency.remove(&*last_used);
        *last_used = tick;
        self.recency.insert(tick, id.clone());
        Some(detail)
    }
}

/// Bounded cache evicting the least recently used detail.
#[derive(Debug)]
pub struct LruDetailsCache {
    capacity: NonZeroUsize,
    state: Mutex<LruState>,
}

impl LruDetailsCache {
    /// Create a cache holding at most `capacity` details.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            state: Mutex::new(LruState::default()),
        }
    }

    /// Maximum number of stored details.
    #[must_use]
    pub const fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Number of stored details.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    /// Return whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.state).entries.is_empty()
    }
}

impl DetailsCache for LruDetailsCache {
    fn get(&self, id: &PlaceId) -> Option<PlaceDetail> {
        lock(&self.state).touch(id).cloned()
    }

    fn put(&self, detail: PlaceDetail) {
        let mut state = lock(&self.state);
        let id = detail.id().clone();
        if let Some((_, stored)) = state.entries.get_mut(&id) {
            *stored = detail;
            state.touch(&id);
            return;
        }
        if state.entries.len() >= self.capacity.get() {
            let oldest = state.recency.pop_first();
            if let Some((_, evicted)) = oldest {
                debug!(place_id = %evicted, "evicting least recently used detail");
                state.entries.remove(&evicted);
            }
        }
        state.tick += 1;
        let tick = state.tick;
        state.recency.insert(tick, id.clone());
        state.entries.insert(id, (tick, detail));
    }

    fn contains(&self, id: &PlaceId) -> bool {
        lock(&self.state).entries.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalize::normalize_detail;
    use crate::test_support::fixtures::{current_detail, place_id};

    fn detail(id: &str) -> PlaceDetail {
        normalize_detail(current_detail(id, &format!("Cafe {id}")).as_value())
            .expect("fixture normalises")
    }

    fn capacity(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).expect("non-zero capacity")
    }

    #[test]
    fn in_memory_cache_stores_by_identifier() {
        let cache = InMemoryDetailsCache::new();
        assert!(cache.is_empty());
        cache.put(detail("a"));

        assert!(cache.contains(&place_id("a")));
        assert!(!cache.contains(&place_id("b")));
        assert_eq!(cache.get(&place_id("a")), Some(detail("a")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn lru_cache_evicts_the_least_recently_used_entry() {
        let cache = LruDetailsCache::new(capacity(2));
        cache.put(detail("a"));
        cache.put(detail("b"));
        assert!(cache.get(&place_id("a")).is_some());

        cache.put(detail("c"));

        assert!(cache.contains(&place_id("a")));
        assert!(!cache.contains(&place_id("b")));
        assert!(cache.contains(&place_id("c")));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn lru_cache_replaces_without_evicting() {
        let cache = LruDetailsCache::new(capacity(1));
        cache.put(detail("a"));
        let mut updated = detail("a");
        updated.phone_number = Some("0522 999 0000".to_owned());
        cache.put(updated.clone());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&place_id("a")), Some(updated));
    }
}
