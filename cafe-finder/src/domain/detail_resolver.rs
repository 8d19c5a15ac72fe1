//! Cached, coalesced place-detail resolution.
//!
//! A cache hit returns without touching the provider. Concurrent misses for
//! the same identifier share one in-flight fetch; the fetch stores its result
//! in the cache before leaving the in-flight table, so a later caller sees
//! either the shared fetch or the cached value. Failures are never cached.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use super::normalize::normalize_detail;
use super::ports::{DetailsCache, PlacesProvider};
use super::{FinderError, PlaceDetail, PlaceId, lock};

/// Current-scheme fields requested for every detail fetch.
pub const DETAIL_FIELDS: &[&str] = &[
    "id",
    "displayName",
    "rating",
    "userRatingCount",
    "nationalPhoneNumber",
    "formattedAddress",
    "regularOpeningHours",
    "currentOpeningHours",
    "photos",
    "reviews",
    "location",
    "websiteUri",
    "googleMapsUri",
    "businessStatus",
];

type DetailFetch = Shared<BoxFuture<'static, Result<PlaceDetail, FinderError>>>;
type InFlight = Arc<Mutex<HashMap<PlaceId, DetailFetch>>>;

/// Resolves [`PlaceDetail`] records by identifier.
pub struct DetailResolver {
    provider: Arc<dyn PlacesProvider>,
    cache: Arc<dyn DetailsCache>,
    in_flight: InFlight,
}

impl DetailResolver {
    /// Build a resolver over a provider and an injected cache.
    #[must_use]
    pub fn new(provider: Arc<dyn PlacesProvider>, cache: Arc<dyn DetailsCache>) -> Self {
        Self {
            provider,
            cache,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Cached detail for `id`, without fetching.
    #[must_use]
    pub fn cached(&self, id: &PlaceId) -> Option<PlaceDetail> {
        self.cache.get(id)
    }

    /// Resolve details for `id`, fetching at most once per identifier.
    ///
    /// # Errors
    /// Returns [`FinderError::DetailFetchFailed`] when the provider call fails
    /// or its record cannot be normalised.
    pub async fn resolve(&self, id: &PlaceId) -> Result<PlaceDetail, FinderError> {
        if let Some(detail) = self.cache.get(id) {
            debug!(place_id = %id, "detail cache hit");
            return Ok(detail);
        }

        let mut in_flight = lock(&self.in_flight);
        if let Some(shared) = in_flight.get(id).cloned() {
            drop(in_flight);
            debug!(place_id = %id, "joining in-flight detail fetch");
            return shared.await;
        }
        // A fetch may have completed between the first lookup and taking the lock.
        if let Some(detail) = self.cache.get(id) {
            return Ok(detail);
        }
        debug!(place_id = %id, "detail cache miss");
        let fetch = self.start_fetch(id.clone());
        in_flight.insert(id.clone(), fetch.clone());
        drop(in_flight);
        fetch.await
    }

    /// Number of fetches currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        lock(&self.in_flight).len()
    }

    fn start_fetch(&self, id: PlaceId) -> DetailFetch {
        let provider = Arc::clone(&self.provider);
        let cache = Arc::clone(&self.cache);
        let in_flight = Arc::clone(&self.in_flight);
        async move {
            let result = fetch_detail(provider.as_ref(), &id)
                .await
                .inspect(|detail| cache.put(detail.clone()))
                .inspect_err(|error| warn!(place_id = %id, %error, "detail fetch failed"));
            lock(&in_flight).remove(&id);
            result
        }
        .boxed()
        .shared()
    }
}

async fn fetch_detail(
    provider: &dyn PlacesProvider,
    id: &PlaceId,
) -> Result<PlaceDetail, FinderError> {
    let failed = |reason: String| FinderError::DetailFetchFailed {
        identifier: id.clone(),
        reason,
    };
    let raw = provider
        .fetch_details(id, DETAIL_FIELDS)
        .await
        .map_err(|error| failed(error.to_string()))?;
    let detail = normalize_detail(raw.as_value()).map_err(|error| failed(error.to_string()))?;
    if detail.id() != id {
        return Err(failed(format!(
            "provider returned details for {}",
            detail.id()
        )));
    }
    Ok(detail)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::{fixture, rstest};
    use tokio::sync::{Notify, mpsc};

    use super::*;
    use crate::domain::ports::{MockDetailsCache, PlacesProviderError};
    use crate::outbound::cache::InMemoryDetailsCache;
    use crate::test_support::fixtures::{current_detail, legacy_detail, place_id};
    use crate::test_support::providers::ScriptedPlacesProvider;

    #[fixture]
    fn provider() -> Arc<ScriptedPlacesProvider> {
        Arc::new(ScriptedPlacesProvider::new())
    }

    fn resolver(provider: &Arc<ScriptedPlacesProvider>) -> DetailResolver {
        DetailResolver::new(
            Arc::clone(provider) as Arc<dyn PlacesProvider>,
            Arc::new(InMemoryDetailsCache::new()),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn second_resolve_is_served_from_cache(provider: Arc<ScriptedPlacesProvider>) {
        provider.push_details(Ok(current_detail("X", "Royal Cafe")));
        let resolver = resolver(&provider);
        let id = place_id("X");

        let first = resolver.resolve(&id).await.expect("first resolve");
        let second = resolver.resolve(&id).await.expect("second resolve");

        assert_eq!(first, second);
        assert_eq!(provider.detail_calls(), 1);
        assert_eq!(resolver.cached(&id), Some(first));
    }

    #[rstest]
    #[tokio::test]
    async fn fetch_requests_the_fixed_field_list(provider: Arc<ScriptedPlacesProvider>) {
        provider.push_details(Ok(current_detail("X", "Royal Cafe")));
        let resolver = resolver(&provider);

        resolver.resolve(&place_id("X")).await.expect("resolves");

        let requests = provider.detail_requests();
        let (id, fields) = requests.first().expect("one fetch");
        assert_eq!(id.as_str(), "X");
        assert_eq!(fields.as_slice(), DETAIL_FIELDS);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_fetch() {
        let (entered_tx, mut entered_rx) = mpsc::unbounded_channel();
        let provider = Arc::new(ScriptedPlacesProvider::new().with_entered(entered_tx));
        let release = Arc::new(Notify::new());
        provider.push_details_gated(Ok(current_detail("X", "Royal Cafe")), Arc::clone(&release));
        let resolver = resolver(&provider);
        let id = place_id("X");

        let (first, second, ()) = tokio::join!(resolver.resolve(&id), resolver.resolve(&id), async {
            entered_rx.recv().await.expect("fetch entered");
            release.notify_one();
        });

        assert_eq!(
            first.expect("first caller"),
            second.expect("second caller")
        );
        assert_eq!(provider.detail_calls(), 1);
        assert_eq!(resolver.in_flight(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn legacy_records_normalise_to_the_same_shape(provider: Arc<ScriptedPlacesProvider>) {
        provider.push_details(Ok(legacy_detail("L", "Chowk Corner")));
        let resolver = resolver(&provider);

        let detail = resolver.resolve(&place_id("L")).await.expect("resolves");

        assert_eq!(detail.summary.name, "Chowk Corner");
        assert_eq!(detail.formatted_address.as_deref(), Some("Old Lane, Lucknow"));
        assert_eq!(detail.phone_number.as_deref(), Some("0522 111 2222"));
        assert_eq!(detail.photos.len(), 1);
        assert_eq!(
            detail.reviews.first().map(|review| review.author.as_str()),
            Some("Meera")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn failures_are_reported_and_not_cached(provider: Arc<ScriptedPlacesProvider>) {
        provider.push_details(Err(PlacesProviderError::timeout("10s elapsed")));
        provider.push_details(Ok(current_detail("X", "Royal Cafe")));
        let resolver = resolver(&provider);
        let id = place_id("X");

        let err = resolver.resolve(&id).await.expect_err("first fetch fails");
        assert!(matches!(
            &err,
            FinderError::DetailFetchFailed { identifier, .. } if identifier == &id
        ));
        assert!(resolver.cached(&id).is_none());

        resolver.resolve(&id).await.expect("retry succeeds");
        assert_eq!(provider.detail_calls(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn mismatched_identity_is_rejected(provider: Arc<ScriptedPlacesProvider>) {
        provider.push_details(Ok(current_detail("Y", "Elsewhere")));
        let resolver = resolver(&provider);

        let err = resolver
            .resolve(&place_id("X"))
            .await
            .expect_err("identity mismatch");
        assert!(matches!(err, FinderError::DetailFetchFailed { .. }));
    }

    #[tokio::test]
    async fn cache_hit_skips_the_provider() {
        let cached = normalize_detail(current_detail("X", "Royal Cafe").as_value())
            .expect("fixture normalises");
        let mut cache = MockDetailsCache::new();
        let hit = cached.clone();
        cache.expect_get().returning(move |_| Some(hit.clone()));
        cache.expect_put().never();
        let provider = Arc::new(ScriptedPlacesProvider::new());
        let resolver = DetailResolver::new(
            Arc::clone(&provider) as Arc<dyn PlacesProvider>,
            Arc::new(cache),
        );

        let detail = resolver.resolve(&place_id("X")).await.expect("cache hit");

        assert_eq!(detail, cached);
        assert_eq!(provider.detail_calls(), 0);
    }
}
