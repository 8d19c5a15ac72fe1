//! Step definitions for explorer session BDD tests.

use cafe_finder::domain::ports::{DirectionsProviderError, GeolocationError};
use cafe_finder::domain::{
    Category, DEFAULT_LOCATION, MISSING_KEY_BANNER, NoticeLevel, ResultsState, SelectedPlace,
    UserIntent,
};
use cafe_finder::test_support::fixtures::{
    coordinate, current_detail, current_place, position_fix,
};
use cafe_finder::test_support::map::MapEvent;
use cafe_finder::test_support::providers::straight_route;
use rstest_bdd_macros::{given, then, when};

use crate::SessionWorld;

#[given("an explorer session with a configured provider")]
fn an_explorer_session_with_a_configured_provider(world: &SessionWorld) {
    world.setup(true);
}

#[given("an explorer session without an API key")]
fn an_explorer_session_without_an_api_key(world: &SessionWorld) {
    world.setup(false);
}

#[given("the provider returns {count} cafes nearby")]
#[expect(
    clippy::float_arithmetic,
    reason = "fixture places are spread along a meridian"
)]
fn the_provider_returns_cafes_nearby(world: &SessionWorld, count: usize) {
    let batch = (0..count)
        .map(|index| {
            let offset = f64::from(u32::try_from(index).expect("small count")) * 0.001;
            current_place(
                &format!("cafe-{index}"),
                &format!("Cafe {index}"),
                26.8467 + offset,
                80.9462,
            )
        })
        .collect();
    world.places().push_nearby(Ok(batch));
}

#[given("the provider describes place \"{id}\"")]
#[expect(
    clippy::needless_pass_by_value,
    reason = "step placeholders arrive as owned strings"
)]
fn the_provider_describes_place(world: &SessionWorld, id: String) {
    world
        .places()
        .push_details(Ok(current_detail(&id, "Cafe 0")));
}

#[given("the session has started")]
fn the_session_has_started(world: &SessionWorld) {
    let session = world.session();
    world.block_on(session.start());
}

#[given("location permission is denied")]
fn location_permission_is_denied(world: &SessionWorld) {
    world
        .geolocation()
        .push(Err(GeolocationError::permission_denied("blocked in settings")));
}

#[given("the user has opened the first place")]
fn the_user_has_opened_the_first_place(world: &SessionWorld) {
    world.open_first_place();
}

#[given("the device reports a position fix")]
fn the_device_reports_a_position_fix(world: &SessionWorld) {
    world
        .geolocation()
        .push(Ok(position_fix(coordinate(26.8500, 80.9400), 15.0)));
}

#[given("routing answers \"{status}\"")]
fn routing_answers(world: &SessionWorld, status: String) {
    world
        .directions()
        .push(Err(DirectionsProviderError::status(status)));
}

#[given("routing finds a walking route")]
fn routing_finds_a_walking_route(world: &SessionWorld) {
    world.directions().push(Ok(straight_route(
        coordinate(26.8500, 80.9400),
        DEFAULT_LOCATION,
    )));
}

#[when("the session starts")]
fn the_session_starts(world: &SessionWorld) {
    the_session_has_started(world);
}

#[when("the user switches to restaurants")]
fn the_user_switches_to_restaurants(world: &SessionWorld) {
    world.surface().clear_events();
    world.dispatch(UserIntent::SelectCategory(Category::Restaurant));
}

#[when("the user presses locate")]
fn the_user_presses_locate(world: &SessionWorld) {
    world.dispatch(UserIntent::Locate);
}

#[when("the user opens the first place twice")]
fn the_user_opens_the_first_place_twice(world: &SessionWorld) {
    world.open_first_place();
    world.dispatch(UserIntent::CloseDetails);
    world.open_first_place();
}

#[when("the user asks for directions")]
fn the_user_asks_for_directions(world: &SessionWorld) {
    world.dispatch(UserIntent::RequestDirections);
}

#[then("{count} places are listed")]
fn places_are_listed(world: &SessionWorld, count: usize) {
    assert_eq!(world.session().results().len(), count);
}

#[then("{count} markers are drawn")]
fn markers_are_drawn(world: &SessionWorld, count: usize) {
    assert_eq!(world.surface().live_markers().len(), count);
}

#[then("{count} markers were removed")]
fn markers_were_removed(world: &SessionWorld, count: usize) {
    let removed = world
        .surface()
        .events()
        .iter()
        .filter(|event| matches!(event, MapEvent::MarkerRemoved(_)))
        .count();
    assert_eq!(removed, count);
}

#[then("the center is still the default location")]
fn the_center_is_still_the_default_location(world: &SessionWorld) {
    let view = world.session().view();
    assert_eq!(view.center.coordinate, DEFAULT_LOCATION);
    assert!(!view.center.from_device);
}

#[then("a warning notice mentions \"{text}\"")]
#[expect(
    clippy::needless_pass_by_value,
    reason = "step placeholders arrive as owned strings"
)]
fn a_warning_notice_mentions(world: &SessionWorld, text: String) {
    let notices = world.session().drain_notices();
    assert!(
        notices
            .iter()
            .any(|notice| notice.level == NoticeLevel::Warning && notice.message.contains(&text)),
        "no warning mentioning {text:?} in {notices:?}"
    );
}

#[then("the detail view shows a resolved place named \"{name}\"")]
#[expect(
    clippy::needless_pass_by_value,
    reason = "step placeholders arrive as owned strings"
)]
fn the_detail_view_shows_a_resolved_place(world: &SessionWorld, name: String) {
    match world.session().view().selected {
        Some(SelectedPlace::Detail(detail)) => assert_eq!(detail.summary.name, name),
        other => panic!("expected resolved detail, got {other:?}"),
    }
}

#[then("the provider was asked for details {count} times")]
fn the_provider_was_asked_for_details(world: &SessionWorld, count: usize) {
    assert_eq!(world.places().detail_calls(), count);
}

#[then("the banner asks for an API key")]
fn the_banner_asks_for_an_api_key(world: &SessionWorld) {
    assert_eq!(
        world.session().view().banner.as_deref(),
        Some(MISSING_KEY_BANNER)
    );
}

#[then("the results failed with \"{reason}\"")]
#[expect(
    clippy::needless_pass_by_value,
    reason = "step placeholders arrive as owned strings"
)]
fn the_results_failed_with(world: &SessionWorld, reason: String) {
    match world.session().view().results {
        ResultsState::Failed(error) => assert!(error.to_string().contains(&reason)),
        other => panic!("expected failed results, got {other:?}"),
    }
}

#[then("a walking route is shown")]
fn a_walking_route_is_shown(world: &SessionWorld) {
    assert!(world.session().view().route_shown);
    assert!(world.surface().route_visible());
}
