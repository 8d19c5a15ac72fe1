//! Scenario bindings for explorer session BDD tests.

use rstest_bdd_macros::scenario;

use crate::{SessionWorld, world};

#[scenario(
    path = "tests/features/session.feature",
    name = "Searching near the default location lists markers"
)]
fn searching_near_the_default_location_lists_markers(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Switching category redraws every marker"
)]
fn switching_category_redraws_every_marker(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "A denied location request leaves the map where it was"
)]
fn a_denied_location_request_leaves_the_map_where_it_was(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Opening a place twice fetches its details once"
)]
fn opening_a_place_twice_fetches_its_details_once(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Directions failure surfaces the provider status"
)]
fn directions_failure_surfaces_the_provider_status(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Directions draw a walking route to the opened place"
)]
fn directions_draw_a_walking_route(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "A missing API key shows the banner"
)]
fn a_missing_api_key_shows_the_banner(world: SessionWorld) {
    drop(world);
}
