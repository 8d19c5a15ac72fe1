//! Raw provider records in both field-naming schemes.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use crate::domain::ports::{PositionFix, RawPlace};
use crate::domain::{Coordinate, PlaceId, PlaceSummary, normalize::normalize_summary};

/// Fixed instant used for position fixes.
///
/// # Panics
/// Never in practice; the calendar date is fixed and unambiguous.
#[must_use]
pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .unwrap_or_else(|| panic!("fixed fixture instant is unambiguous"))
}

/// Validated coordinate.
///
/// # Panics
/// Panics when the pair is out of range.
#[must_use]
pub fn coordinate(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate::new(latitude, longitude)
        .unwrap_or_else(|error| panic!("invalid fixture coordinate: {error}"))
}

/// Validated place identifier.
///
/// # Panics
/// Panics when `raw` is blank.
#[must_use]
pub fn place_id(raw: &str) -> PlaceId {
    PlaceId::new(raw).unwrap_or_else(|error| panic!("invalid fixture place id: {error}"))
}

/// Current-scheme nearby-search record.
#[must_use]
pub fn current_place(id: &str, name: &str, latitude: f64, longitude: f64) -> RawPlace {
    RawPlace(json!({
        "id": id,
        "displayName": { "text": name, "languageCode": "en" },
        "location": { "latitude": latitude, "longitude": longitude },
        "formattedAddress": format!("{name}, Hazratganj, Lucknow"),
        "businessStatus": "OPERATIONAL",
    }))
}

/// Current-scheme record carrying a rating and rating count.
#[must_use]
pub fn rated_place(id: &str, rating: Option<f64>) -> RawPlace {
    let mut raw = current_place(id, &format!("Place {id}"), 26.8467, 80.9462);
    if let (Some(stars), Some(object)) = (rating, raw.0.as_object_mut()) {
        object.insert("rating".to_owned(), json!(stars));
        object.insert("userRatingCount".to_owned(), json!(87));
    }
    raw
}

/// Current-scheme record with an open-now flag.
#[must_use]
pub fn place_open_now(id: &str, open_now: Option<bool>) -> RawPlace {
    let mut raw = current_place(id, &format!("Place {id}"), 26.8467, 80.9462);
    if let (Some(open), Some(object)) = (open_now, raw.0.as_object_mut()) {
        object.insert("currentOpeningHours".to_owned(), json!({ "openNow": open }));
    }
    raw
}

/// Legacy-scheme nearby-search record.
#[must_use]
pub fn legacy_place(id: &str, name: &str, latitude: f64, longitude: f64) -> RawPlace {
    RawPlace(json!({
        "place_id": id,
        "name": name,
        "geometry": { "location": { "lat": latitude, "lng": longitude } },
        "vicinity": "Aminabad, Lucknow",
        "rating": 4.1,
        "user_ratings_total": 310,
    }))
}

/// Current-scheme detail record with photos, reviews, and hours.
#[must_use]
pub fn current_detail(id: &str, name: &str) -> RawPlace {
    RawPlace(json!({
        "id": id,
        "displayName": { "text": name },
        "location": { "latitude": 26.8467, "longitude": 80.9462 },
        "rating": 4.5,
        "userRatingCount": 1204,
        "formattedAddress": "14 Mall Avenue, Lucknow, Uttar Pradesh",
        "nationalPhoneNumber": "0522 400 1234",
        "websiteUri": "https://example.com/cafe",
        "googleMapsUri": "https://maps.google.com/?cid=42",
        "regularOpeningHours": {
            "openNow": true,
            "weekdayDescriptions": ["Monday: 8:00 AM – 10:00 PM"],
        },
        "photos": [
            {
                "name": format!("places/{id}/photos/p1"),
                "widthPx": 1200,
                "heightPx": 800,
                "authorAttributions": [{ "displayName": "Asha" }],
            }
        ],
        "reviews": [
            {
                "rating": 5,
                "text": { "text": "Excellent filter coffee." },
                "authorAttribution": { "displayName": "Ravi" },
                "relativePublishTimeDescription": "a week ago",
            }
        ],
    }))
}

/// Legacy-scheme detail record.
#[must_use]
pub fn legacy_detail(id: &str, name: &str) -> RawPlace {
    RawPlace(json!({
        "place_id": id,
        "name": name,
        "geometry": { "location": { "lat": 26.85, "lng": 80.95 } },
        "formatted_address": "Old Lane, Lucknow",
        "formatted_phone_number": "0522 111 2222",
        "website": "https://example.com/legacy",
        "url": "https://maps.google.com/?cid=7",
        "opening_hours": { "open_now": false, "weekday_text": ["Monday: Closed"] },
        "photos": [{ "photo_reference": "legacy-ref", "width": 640, "height": 480 }],
        "reviews": [{ "author_name": "Meera", "rating": 4, "text": "Cosy." }],
    }))
}

/// Text-search record used for suggestions.
#[must_use]
pub fn suggestion_record(name: &str, latitude: f64, longitude: f64) -> RawPlace {
    RawPlace(json!({
        "displayName": { "text": name },
        "location": { "latitude": latitude, "longitude": longitude },
    }))
}

/// Normalised summary for a current-scheme record.
///
/// # Panics
/// Panics when `id` is blank.
#[must_use]
pub fn summary(id: &str) -> PlaceSummary {
    let raw = current_place(id, &format!("Place {id}"), 26.8467, 80.9462);
    normalize_summary(raw.as_value())
        .unwrap_or_else(|error| panic!("fixture record does not normalise: {error}"))
}

/// Position fix at `coordinate` with a fixed timestamp.
#[must_use]
pub fn position_fix(coordinate: Coordinate, accuracy_metres: f64) -> PositionFix {
    PositionFix {
        coordinate,
        accuracy_metres,
        fixed_at: fixed_instant(),
    }
}
