//! Headless front end: runs one explorer session against the configured
//! provider and prints what a map UI would show.

use std::ffi::OsString;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::sync::Arc;

use cafe_finder::config::FinderSettings;
use cafe_finder::domain::ports::{Geolocation, MapSurface};
use cafe_finder::domain::{
    Category, Center, Coordinate, DETAIL_PHOTO_LIMIT, DETAIL_REVIEW_LIMIT, ExplorerSession,
    FilterState, ResultsState, SelectedPlace, SessionConfig, SessionPorts, UserIntent, ViewState,
};
use cafe_finder::outbound::cache::LruDetailsCache;
use cafe_finder::outbound::geolocation::{FixedGeolocation, UnavailableGeolocation};
use cafe_finder::outbound::google::PhotoUrlBuilder;
use cafe_finder::outbound::map::HeadlessMapSurface;
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

const DETAIL_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::MIN.saturating_add(63);
const DEVICE_ACCURACY_METRES: f64 = 25.0;

/// `cafe-finder` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cafe-finder",
    about = "Find cafes, restaurants, and attractions near a point",
    version
)]
struct CliArgs {
    /// Category tab: cafe, restaurant, or tourist_attraction (or its tab key).
    #[arg(long, default_value = "cafe")]
    category: Category,
    /// Search radius in metres, clamped to 250..=5000.
    #[arg(long, default_value_t = cafe_finder::domain::DEFAULT_RADIUS_METRES)]
    radius: u32,
    /// Keep only places open right now.
    #[arg(long)]
    open_now: bool,
    /// Minimum rating, 0 disables.
    #[arg(long, default_value_t = 0.0)]
    min_rating: f64,
    /// Search center as `lat,lng`; defaults to the built-in location.
    #[arg(long, value_name = "lat,lng", value_parser = parse_coordinate)]
    center: Option<Coordinate>,
    /// Free-text place to recenter on (first suggestion wins).
    #[arg(long)]
    query: Option<String>,
    /// Device position as `lat,lng`, used for locate and directions.
    #[arg(long, value_name = "lat,lng", value_parser = parse_coordinate)]
    device: Option<Coordinate>,
    /// Recenter on the device position before searching.
    #[arg(long)]
    locate: bool,
    /// Zero-based index of the result to open.
    #[arg(long)]
    select: Option<usize>,
    /// Request walking directions to the opened place.
    #[arg(long, requires = "select")]
    directions: bool,
    /// Behave like a narrow screen (no selection zoom).
    #[arg(long)]
    compact: bool,
}

fn parse_coordinate(raw: &str) -> Result<Coordinate, String> {
    let (latitude, longitude) = raw
        .split_once(',')
        .ok_or_else(|| "expected `lat,lng`".to_owned())?;
    let parse = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|error| format!("invalid number {value:?}: {error}"))
    };
    Coordinate::new(parse(latitude)?, parse(longitude)?).map_err(|error| error.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = FinderSettings::load_from_iter([OsString::from("cafe-finder")])
        .map_err(|error| eyre!("load settings: {error}"))?;
    let providers = settings.providers().wrap_err("build provider adapters")?;

    let geolocation = args.device.map_or_else(
        || Arc::new(UnavailableGeolocation) as Arc<dyn Geolocation>,
        |coordinate| {
            Arc::new(FixedGeolocation::new(
                coordinate,
                DEVICE_ACCURACY_METRES,
                Arc::new(DefaultClock),
            )) as Arc<dyn Geolocation>
        },
    );
    let map: Arc<dyn MapSurface> = if args.compact {
        Arc::new(HeadlessMapSurface::compact())
    } else {
        Arc::new(HeadlessMapSurface::new())
    };
    let ports = SessionPorts::new(
        providers.places,
        providers.directions,
        geolocation,
        Arc::new(LruDetailsCache::new(DETAIL_CACHE_CAPACITY)),
        map,
    );
    let session = ExplorerSession::with_config(
        ports,
        SessionConfig {
            provider_ready: providers.ready,
            ..SessionConfig::default()
        },
    );

    run(&session, &args).await;
    let mut out = io::stdout().lock();
    print_view(&mut out, &session.view(), providers.photos.as_ref())
        .wrap_err("write view")?;
    for notice in session.drain_notices() {
        writeln!(out, "[{:?}] {}", notice.level, notice.message).wrap_err("write notice")?;
    }
    session.teardown();
    Ok(())
}

async fn run(session: &ExplorerSession, args: &CliArgs) {
    session
        .dispatch(UserIntent::ChangeFilters(FilterState {
            radius_metres: args.radius,
            open_now: args.open_now,
            min_rating: args.min_rating,
        }))
        .await;
    if args.category != Category::default() {
        session.dispatch(UserIntent::SelectCategory(args.category)).await;
    }
    if let Some(center) = args.center {
        session
            .dispatch(UserIntent::ChangeCenter(Center::manual(center)))
            .await;
    }
    if args.locate {
        session.dispatch(UserIntent::Locate).await;
    }
    if let Some(query) = &args.query {
        session.dispatch(UserIntent::TypeQuery(query.clone())).await;
        session.dispatch(UserIntent::SubmitQuery).await;
    }
    let Some(index) = args.select else {
        return;
    };
    let Some(place) = session.results().into_iter().nth(index) else {
        warn!(index, "no result at that index");
        return;
    };
    session.dispatch(UserIntent::SelectPlace(place)).await;
    if args.directions {
        session.dispatch(UserIntent::RequestDirections).await;
    }
}

fn print_view(
    out: &mut impl Write,
    view: &ViewState,
    photos: Option<&PhotoUrlBuilder>,
) -> io::Result<()> {
    if let Some(banner) = &view.banner {
        writeln!(out, "! {banner}")?;
    }
    if let Some(error) = &view.suggestion_error {
        writeln!(out, "! {error}")?;
    }
    writeln!(
        out,
        "{} within {} m of {:.5},{:.5}",
        view.category,
        view.filters.radius_metres,
        view.center.coordinate.latitude(),
        view.center.coordinate.longitude()
    )?;
    match &view.results {
        ResultsState::Idle | ResultsState::Loading => writeln!(out, "(no search yet)")?,
        ResultsState::Empty => writeln!(out, "No places found.")?,
        ResultsState::Failed(error) => writeln!(out, "! {error}")?,
        ResultsState::Ready(places) => {
            for (index, place) in places.iter().enumerate() {
                let rating = place
                    .rating
                    .map_or_else(|| "-".to_owned(), |stars| format!("{stars:.1}"));
                writeln!(
                    out,
                    "{index:>2}. {} [{rating}] {}",
                    place.name,
                    place.address.as_deref().unwrap_or_default()
                )?;
            }
        }
    }
    match &view.selected {
        Some(SelectedPlace::Detail(detail)) => {
            writeln!(out, "== {}", detail.summary.name)?;
            for line in [
                detail.display_address(),
                detail.phone_number.as_deref(),
                detail.website.as_deref(),
            ]
            .into_iter()
            .flatten()
            {
                writeln!(out, "   {line}")?;
            }
            if let Some(hours) = &detail.opening_hours {
                for line in &hours.weekday_descriptions {
                    writeln!(out, "   {line}")?;
                }
            }
            if let Some(photos) = photos {
                for url in detail
                    .photo_strip(DETAIL_PHOTO_LIMIT)
                    .iter()
                    .filter_map(|photo| photos.url_for(photo))
                {
                    writeln!(out, "   photo: {url}")?;
                }
            }
            for review in detail.top_reviews(DETAIL_REVIEW_LIMIT) {
                writeln!(out, "   \"{}\" by {}", review.text, review.author)?;
            }
        }
        Some(SelectedPlace::Summary(summary)) => writeln!(out, "== {}", summary.name)?,
        None => {}
    }
    if let Some(error) = &view.detail_error {
        writeln!(out, "! {error}")?;
    }
    if view.route_shown {
        writeln!(out, "Walking route drawn.")?;
    }
    Ok(())
}
