//! Behaviour-driven tests for explorer session intent handling.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::Arc;

use cafe_finder::domain::ExplorerSession;
use cafe_finder::test_support::map::RecordingMapSurface;
use cafe_finder::test_support::providers::{
    ScriptedDirections, ScriptedGeolocation, ScriptedPlacesProvider,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tokio::runtime::Runtime;

#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

#[derive(Default, ScenarioState)]
struct SessionWorld {
    runtime: Slot<RuntimeHandle>,
    session: Slot<Arc<ExplorerSession>>,
    places: Slot<Arc<ScriptedPlacesProvider>>,
    directions: Slot<Arc<ScriptedDirections>>,
    geolocation: Slot<Arc<ScriptedGeolocation>>,
    surface: Slot<Arc<RecordingMapSurface>>,
}

#[fixture]
fn world() -> SessionWorld {
    SessionWorld::default()
}

#[path = "session_behaviour/world.rs"]
mod session_world;

#[path = "session_behaviour/steps.rs"]
mod session_steps;

#[path = "session_behaviour/scenario_bindings.rs"]
mod session_scenarios;
