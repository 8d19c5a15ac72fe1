//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod details_cache;
mod directions_provider;
mod geolocation;
mod map_surface;
mod places_provider;

#[cfg(test)]
pub use details_cache::MockDetailsCache;
pub use details_cache::DetailsCache;
#[cfg(test)]
pub use directions_provider::MockDirectionsProvider;
pub use directions_provider::{
    DirectionsProvider, DirectionsProviderError, DisabledDirectionsProvider, Route, RouteRequest,
    TravelMode,
};
#[cfg(test)]
pub use geolocation::MockGeolocation;
pub use geolocation::{Geolocation, GeolocationError, PositionFix};
#[cfg(test)]
pub use map_surface::MockMapSurface;
pub use map_surface::{LocationHandle, MapSurface, MarkerHandle};
#[cfg(test)]
pub use places_provider::MockPlacesProvider;
pub use places_provider::{
    DisabledPlacesProvider, NearbySearchRequest, PROVIDER_PAGE_SIZE, PlacesProvider,
    PlacesProviderError, RawPlace, TextSearchRequest,
};
