//! Scenario-world methods for explorer session BDD tests.

use std::future::Future;
use std::sync::Arc;

use cafe_finder::domain::ports::{DisabledPlacesProvider, PlacesProvider};
use cafe_finder::domain::{ExplorerSession, SessionConfig, SessionPorts, UserIntent};
use cafe_finder::outbound::cache::InMemoryDetailsCache;
use cafe_finder::test_support::map::RecordingMapSurface;
use cafe_finder::test_support::providers::{
    ScriptedDirections, ScriptedGeolocation, ScriptedPlacesProvider,
};
use tokio::runtime::Builder;

use crate::{RuntimeHandle, SessionWorld};

impl SessionWorld {
    /// Wire a session over scripted doubles.
    pub fn setup(&self, configured: bool) {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("create runtime");
        let places = Arc::new(ScriptedPlacesProvider::new());
        let directions = Arc::new(ScriptedDirections::default());
        let geolocation = Arc::new(ScriptedGeolocation::default());
        let surface = Arc::new(RecordingMapSurface::new());
        let provider: Arc<dyn PlacesProvider> = if configured {
            places.clone()
        } else {
            Arc::new(DisabledPlacesProvider)
        };
        let session = ExplorerSession::with_config(
            SessionPorts::new(
                provider,
                directions.clone(),
                geolocation.clone(),
                Arc::new(InMemoryDetailsCache::new()),
                surface.clone(),
            ),
            SessionConfig {
                provider_ready: configured,
                ..SessionConfig::default()
            },
        );

        self.runtime.set(RuntimeHandle(Arc::new(runtime)));
        self.session.set(Arc::new(session));
        self.places.set(places);
        self.directions.set(directions);
        self.geolocation.set(geolocation);
        self.surface.set(surface);
    }

    pub fn session(&self) -> Arc<ExplorerSession> {
        self.session.get().expect("session should be set")
    }

    pub fn places(&self) -> Arc<ScriptedPlacesProvider> {
        self.places.get().expect("places provider should be set")
    }

    pub fn directions(&self) -> Arc<ScriptedDirections> {
        self.directions.get().expect("directions provider should be set")
    }

    pub fn geolocation(&self) -> Arc<ScriptedGeolocation> {
        self.geolocation.get().expect("geolocation should be set")
    }

    pub fn surface(&self) -> Arc<RecordingMapSurface> {
        self.surface.get().expect("map surface should be set")
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        let runtime = self.runtime.get().expect("runtime should be set");
        runtime.0.block_on(future)
    }

    pub fn dispatch(&self, intent: UserIntent) {
        let session = self.session();
        self.block_on(session.dispatch(intent));
    }

    pub fn open_first_place(&self) {
        let session = self.session();
        let first = session
            .results()
            .into_iter()
            .next()
            .expect("at least one place listed");
        self.dispatch(UserIntent::SelectPlace(first));
    }
}
