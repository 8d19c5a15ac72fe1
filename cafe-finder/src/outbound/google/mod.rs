//! Google Maps Platform adapters.
//!
//! Places and Routes are called through their JSON-over-HTTPS APIs with the
//! key in `X-Goog-Api-Key` and the response shape pinned by
//! `X-Goog-FieldMask`.

mod errors;
mod photos;
mod places_http;
mod polyline;
mod routes_http;

pub use photos::{DEFAULT_PHOTO_MAX_WIDTH, PhotoUrlBuilder};
pub use places_http::{DEFAULT_PLACES_ENDPOINT, GooglePlacesHttp, NEARBY_FIELDS, TEXT_FIELDS};
pub use polyline::{PolylineError, decode_polyline};
pub use routes_http::{DEFAULT_ROUTES_ENDPOINT, GoogleRoutesHttp};

const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";
