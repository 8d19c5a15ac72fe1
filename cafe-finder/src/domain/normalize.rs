//! Field-name normalisation across the provider's two response schemes.
//!
//! Each canonical field maps to an ordered list of candidate paths: current
//! scheme first, legacy scheme after. The first candidate holding a value of
//! the expected shape wins. Consumers only ever see canonical records such as
//! [`PlaceSummary`](super::PlaceSummary) and [`PlaceDetail`](super::PlaceDetail).

use serde_json::Value;
use thiserror::Error;

use super::{
    BusinessStatus, Coordinate, OpeningHours, PhotoRef, PhotoToken, PlaceDetail, PlaceId,
    PlaceSummary, Review, Suggestion,
};

/// Canonical place fields resolved through [`PLACE_FIELDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceField {
    /// Provider identifier.
    Id,
    /// Display name.
    Name,
    /// Location object.
    Location,
    /// Average rating.
    Rating,
    /// Number of ratings.
    RatingCount,
    /// Short address shown on list cards.
    AddressFragment,
    /// Full formatted address.
    FormattedAddress,
    /// Phone number.
    Phone,
    /// Website URL.
    Website,
    /// Canonical provider URL.
    ProviderUrl,
    /// Regular opening hours object.
    OpeningHours,
    /// Current open-now flag.
    OpenNow,
    /// Photo array.
    Photos,
    /// Review array.
    Reviews,
    /// Operational status string.
    BusinessStatus,
}

/// Canonical field → ordered candidate paths (dot-separated).
pub const PLACE_FIELDS: &[(PlaceField, &[&str])] = &[
    (PlaceField::Id, &["id", "place_id", "placeId"]),
    (PlaceField::Name, &["displayName.text", "displayName", "name"]),
    (PlaceField::Location, &["location", "geometry.location"]),
    (PlaceField::Rating, &["rating"]),
    (PlaceField::RatingCount, &["userRatingCount", "user_ratings_total"]),
    (
        PlaceField::AddressFragment,
        &["formattedAddress", "vicinity", "formatted_address"],
    ),
    (
        PlaceField::FormattedAddress,
        &["formattedAddress", "formatted_address"],
    ),
    (
        PlaceField::Phone,
        &[
            "nationalPhoneNumber",
            "formattedPhoneNumber",
            "formatted_phone_number",
            "internationalPhoneNumber",
            "international_phone_number",
        ],
    ),
    (PlaceField::Website, &["websiteUri", "websiteURI", "website"]),
    (PlaceField::ProviderUrl, &["googleMapsUri", "googleMapsURI", "url"]),
    (
        PlaceField::OpeningHours,
        &["regularOpeningHours", "opening_hours"],
    ),
    (
        PlaceField::OpenNow,
        &[
            "currentOpeningHours.openNow",
            "regularOpeningHours.openNow",
            "opening_hours.open_now",
        ],
    ),
    (PlaceField::Photos, &["photos"]),
    (PlaceField::Reviews, &["reviews"]),
    (PlaceField::BusinessStatus, &["businessStatus", "business_status"]),
];

/// Current-scheme `name` holds the resource path, never a display name.
const RESOURCE_NAME_PREFIX: &str = "places/";

const HOURS_OPEN_NOW: &[&str] = &["openNow", "open_now"];
const HOURS_WEEKDAYS: &[&str] = &["weekdayDescriptions", "weekday_text"];

const PHOTO_RESOURCE: &[&str] = &["name"];
const PHOTO_LEGACY_REFERENCE: &[&str] = &["photo_reference"];
const PHOTO_WIDTH: &[&str] = &["widthPx", "width"];
const PHOTO_HEIGHT: &[&str] = &["heightPx", "height"];

const REVIEW_AUTHOR: &[&str] = &["authorAttribution.displayName", "author_name"];
const REVIEW_RATING: &[&str] = &["rating"];
const REVIEW_TEXT: &[&str] = &["text.text", "originalText.text", "text"];
const REVIEW_RELATIVE_TIME: &[&str] = &[
    "relativePublishTimeDescription",
    "relative_time_description",
];

/// Errors raised when a raw record cannot be mapped to a canonical shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// A required canonical field has no usable candidate.
    #[error("place record is missing required field `{0}`")]
    MissingField(&'static str),
    /// The record is not a JSON object.
    #[error("place record must be a JSON object")]
    NotAnObject,
}

/// Map a raw nearby-search record into a [`PlaceSummary`].
///
/// # Examples
/// ```
/// use cafe_finder::domain::normalize::normalize_summary;
/// use serde_json::json;
///
/// let legacy = json!({
///     "place_id": "abc",
///     "name": "Cool Cafe",
///     "geometry": { "location": { "lat": 26.85, "lng": 80.95 } },
///     "user_ratings_total": 12,
/// });
/// let summary = normalize_summary(&legacy).expect("legacy record maps");
/// assert_eq!(summary.name, "Cool Cafe");
/// assert_eq!(summary.rating_count, Some(12));
/// ```
pub fn normalize_summary(raw: &Value) -> Result<PlaceSummary, NormalizeError> {
    if !raw.is_object() {
        return Err(NormalizeError::NotAnObject);
    }
    let id = string_field(raw, PlaceField::Id)
        .and_then(|id| PlaceId::new(id).ok())
        .ok_or(NormalizeError::MissingField("id"))?;
    let name = display_name(raw).ok_or(NormalizeError::MissingField("name"))?;
    let coordinate = candidates(PlaceField::Location)
        .iter()
        .filter_map(|path| at_path(raw, path))
        .find_map(coordinate_from)
        .ok_or(NormalizeError::MissingField("location"))?;
    let primary_photo = array_field(raw, PlaceField::Photos)
        .and_then(|photos| photos.iter().find_map(photo_from));

    Ok(PlaceSummary {
        id,
        name,
        coordinate,
        rating: rating_from(first_number(raw, candidates(PlaceField::Rating))),
        rating_count: first_number(raw, candidates(PlaceField::RatingCount))
            .and_then(count_from),
        primary_photo,
        address: string_field(raw, PlaceField::AddressFragment),
        open_now: first_bool(raw, candidates(PlaceField::OpenNow)),
        business_status: string_field(raw, PlaceField::BusinessStatus)
            .and_then(|status| BusinessStatus::from_provider(&status)),
    })
}

/// Map a raw detail record into a [`PlaceDetail`].
///
/// # Errors
///
/// Returns [`NormalizeError`] when identity fields are missing.
pub fn normalize_detail(raw: &Value) -> Result<PlaceDetail, NormalizeError> {
    let summary = normalize_summary(raw)?;
    let photos = array_field(raw, PlaceField::Photos)
        .map(|photos| photos.iter().filter_map(photo_from).collect())
        .unwrap_or_default();
    let reviews = array_field(raw, PlaceField::Reviews)
        .map(|reviews| reviews.iter().filter_map(review_from).collect())
        .unwrap_or_default();
    let opening_hours = candidates(PlaceField::OpeningHours)
        .iter()
        .filter_map(|path| at_path(raw, path))
        .find(|value| value.is_object())
        .map(opening_hours_from);

    Ok(PlaceDetail {
        summary,
        formatted_address: string_field(raw, PlaceField::FormattedAddress),
        phone_number: string_field(raw, PlaceField::Phone),
        website: string_field(raw, PlaceField::Website),
        provider_url: string_field(raw, PlaceField::ProviderUrl),
        opening_hours,
        photos,
        reviews,
    })
}

/// Map a raw text-search record into a [`Suggestion`].
///
/// # Errors
///
/// Returns [`NormalizeError`] when the name or location is missing.
pub fn normalize_suggestion(raw: &Value) -> Result<Suggestion, NormalizeError> {
    if !raw.is_object() {
        return Err(NormalizeError::NotAnObject);
    }
    let name = display_name(raw).ok_or(NormalizeError::MissingField("name"))?;
    let coordinate = candidates(PlaceField::Location)
        .iter()
        .filter_map(|path| at_path(raw, path))
        .find_map(coordinate_from)
        .ok_or(NormalizeError::MissingField("location"))?;
    Ok(Suggestion {
        id: string_field(raw, PlaceField::Id).and_then(|id| PlaceId::new(id).ok()),
        name,
        coordinate,
    })
}

/// Candidate paths for one canonical field.
#[must_use]
pub fn candidates(field: PlaceField) -> &'static [&'static str] {
    PLACE_FIELDS
        .iter()
        .find(|(candidate, _)| *candidate == field)
        .map(|(_, paths)| *paths)
        .unwrap_or_default()
}

fn string_field(raw: &Value, field: PlaceField) -> Option<String> {
    first_string(raw, candidates(field))
}

fn display_name(raw: &Value) -> Option<String> {
    candidates(PlaceField::Name)
        .iter()
        .filter_map(|path| at_path(raw, path))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|value| !value.is_empty() && !value.starts_with(RESOURCE_NAME_PREFIX))
        .map(str::to_owned)
}

fn array_field(raw: &Value, field: PlaceField) -> Option<&Vec<Value>> {
    candidates(field)
        .iter()
        .filter_map(|path| at_path(raw, path))
        .find_map(Value::as_array)
}

fn at_path<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(raw, |node, segment| node.get(segment))
        .filter(|value| !value.is_null())
}

fn first_string(raw: &Value, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .filter_map(|path| at_path(raw, path))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_owned)
}

fn first_number(raw: &Value, paths: &[&str]) -> Option<f64> {
    paths
        .iter()
        .filter_map(|path| at_path(raw, path))
        .find_map(Value::as_f64)
        .filter(|value| value.is_finite())
}

fn first_bool(raw: &Value, paths: &[&str]) -> Option<bool> {
    paths
        .iter()
        .filter_map(|path| at_path(raw, path))
        .find_map(Value::as_bool)
}

fn rating_from(value: Option<f64>) -> Option<f64> {
    value.map(|rating| rating.clamp(0.0, 5.0))
}

fn count_from(value: f64) -> Option<u32> {
    if value < 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "range checked above; counts are integral"
    )]
    let count = value.round() as u32;
    Some(count)
}

fn pixel_size(raw: &Value, paths: &[&str]) -> Option<u32> {
    first_number(raw, paths).and_then(count_from)
}

fn coordinate_from(value: &Value) -> Option<Coordinate> {
    let pairs = [("latitude", "longitude"), ("lat", "lng")];
    pairs.iter().find_map(|(lat_key, lng_key)| {
        let latitude = value.get(lat_key)?.as_f64()?;
        let longitude = value.get(lng_key)?.as_f64()?;
        Coordinate::new(latitude, longitude).ok()
    })
}

fn photo_from(raw: &Value) -> Option<PhotoRef> {
    let token = first_string(raw, PHOTO_RESOURCE)
        .map(PhotoToken::Resource)
        .or_else(|| first_string(raw, PHOTO_LEGACY_REFERENCE).map(PhotoToken::LegacyReference))?;
    Some(PhotoRef {
        token,
        width_px: pixel_size(raw, PHOTO_WIDTH),
        height_px: pixel_size(raw, PHOTO_HEIGHT),
        attributions: photo_attributions(raw),
    })
}

fn photo_attributions(raw: &Value) -> Vec<String> {
    if let Some(current) = raw.get("authorAttributions").and_then(Value::as_array) {
        return current
            .iter()
            .filter_map(|entry| first_string(entry, &["displayName"]))
            .collect();
    }
    raw.get("html_attributions")
        .and_then(Value::as_array)
        .map(|legacy| {
            legacy
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn review_from(raw: &Value) -> Option<Review> {
    let author = first_string(raw, REVIEW_AUTHOR)?;
    Some(Review {
        author,
        rating: rating_from(first_number(raw, REVIEW_RATING)),
        text: first_string(raw, REVIEW_TEXT).unwrap_or_default(),
        relative_time: first_string(raw, REVIEW_RELATIVE_TIME),
    })
}

fn opening_hours_from(raw: &Value) -> OpeningHours {
    let weekday_descriptions = HOURS_WEEKDAYS
        .iter()
        .filter_map(|path| at_path(raw, path))
        .find_map(Value::as_array)
        .map(|lines| {
            lines
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();
    OpeningHours {
        open_now: first_bool(raw, HOURS_OPEN_NOW),
        weekday_descriptions,
    }
}
