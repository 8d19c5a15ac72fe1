//! Canonical place records exposed to the presentation layer.
//!
//! Provider responses arrive in two field-naming schemes; by the time a
//! record reaches these types it has been normalised (see
//! [`super::normalize`]). Summaries are immutable: selecting a place fetches a
//! separate [`PlaceDetail`] instead of mutating the summary.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Coordinate;

/// Provider-assigned place identifier, stable across calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaceId(String);

/// Validation errors returned when constructing a [`PlaceId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceIdValidationError {
    /// Identifier is empty after trimming whitespace.
    #[error("place identifier must not be empty")]
    Empty,
}

impl PlaceId {
    /// Construct an identifier, trimming surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use cafe_finder::domain::PlaceId;
    ///
    /// let id = PlaceId::new(" ChIJ42 ").expect("valid id");
    /// assert_eq!(id.as_str(), "ChIJ42");
    /// assert!(PlaceId::new("  ").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, PlaceIdValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PlaceIdValidationError::Empty);
        }
        if trimmed.len() == raw.len() {
            Ok(Self(raw))
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for PlaceId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for PlaceId {
    type Error = PlaceIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlaceId> for String {
    fn from(value: PlaceId) -> Self {
        value.0
    }
}

/// Opaque photo token tagged with the schema that produced it.
///
/// The two schemas address photo media differently, so the tag travels with
/// the token until a URL is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", content = "token", rename_all = "snake_case")]
pub enum PhotoToken {
    /// Current-scheme resource name (`places/<id>/photos/<ref>`).
    Resource(String),
    /// Legacy-scheme `photo_reference`.
    LegacyReference(String),
}

/// Photo reference plus the metadata needed to render attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    /// Token used to fetch the photo media.
    pub token: PhotoToken,
    /// Original width in pixels, when reported.
    pub width_px: Option<u32>,
    /// Original height in pixels, when reported.
    pub height_px: Option<u32>,
    /// Author attributions that must accompany the photo.
    pub attributions: Vec<String>,
}

/// Operational status reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessStatus {
    /// Trading normally.
    Operational,
    /// Temporarily closed.
    ClosedTemporarily,
    /// Permanently closed.
    ClosedPermanently,
}

impl BusinessStatus {
    /// Parse the provider's upper-case status string.
    #[must_use]
    pub fn from_provider(raw: &str) -> Option<Self> {
        match raw {
            "OPERATIONAL" => Some(Self::Operational),
            "CLOSED_TEMPORARILY" => Some(Self::ClosedTemporarily),
            "CLOSED_PERMANENTLY" => Some(Self::ClosedPermanently),
            _ => None,
        }
    }
}

/// Result of a nearby search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummary {
    /// Stable provider identifier.
    pub id: PlaceId,
    /// Display name.
    pub name: String,
    /// Place location.
    pub coordinate: Coordinate,
    /// Average rating in `[0, 5]`.
    pub rating: Option<f64>,
    /// Number of ratings behind [`Self::rating`].
    pub rating_count: Option<u32>,
    /// First photo, used as the list thumbnail.
    pub primary_photo: Option<PhotoRef>,
    /// Short address or vicinity.
    pub address: Option<String>,
    /// Whether the place is open right now, when the provider knows.
    pub open_now: Option<bool>,
    /// Operational status, when reported.
    pub business_status: Option<BusinessStatus>,
}

/// Opening hours in display form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpeningHours {
    /// Whether the place is open right now, when known.
    pub open_now: Option<bool>,
    /// One human-readable line per weekday, Monday first.
    pub weekday_descriptions: Vec<String>,
}

/// One user review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Reviewer display name.
    pub author: String,
    /// Rating given by the reviewer.
    pub rating: Option<f64>,
    /// Review body; may be empty for rating-only reviews.
    pub text: String,
    /// Provider-formatted relative age ("2 weeks ago").
    pub relative_time: Option<String>,
}

/// Extended record fetched when a place is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetail {
    /// Identity and summary-level fields.
    pub summary: PlaceSummary,
    /// Full formatted address.
    pub formatted_address: Option<String>,
    /// Phone number in national format where available.
    pub phone_number: Option<String>,
    /// Place website.
    pub website: Option<String>,
    /// Canonical provider URL for the place.
    pub provider_url: Option<String>,
    /// Regular opening hours.
    pub opening_hours: Option<OpeningHours>,
    /// Ordered photo references.
    pub photos: Vec<PhotoRef>,
    /// Ordered reviews.
    pub reviews: Vec<Review>,
}

impl PlaceDetail {
    /// Identifier shared with the originating summary.
    #[must_use]
    pub const fn id(&self) -> &PlaceId {
        &self.summary.id
    }

    /// Address line for the detail header, falling back to the summary fragment.
    #[must_use]
    pub fn display_address(&self) -> Option<&str> {
        self.formatted_address
            .as_deref()
            .or(self.summary.address.as_deref())
    }

    /// First `limit` photos, as shown in the detail photo strip.
    #[must_use]
    pub fn photo_strip(&self, limit: usize) -> &[PhotoRef] {
        let end = limit.min(self.photos.len());
        self.photos.get(..end).unwrap_or_default()
    }

    /// First `limit` reviews, as shown under "Top reviews".
    #[must_use]
    pub fn top_reviews(&self, limit: usize) -> &[Review] {
        let end = limit.min(self.reviews.len());
        self.reviews.get(..end).unwrap_or_default()
    }
}

/// Free-text search suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Provider identifier, when returned.
    pub id: Option<PlaceId>,
    /// Display name.
    pub name: String,
    /// Location the map recenters on when chosen.
    pub coordinate: Coordinate,
}

/// Place currently shown in the detail view.
///
/// Starts as the clicked summary and is replaced by the detail record once
/// resolution completes.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectedPlace {
    /// Summary shown while details resolve (or after resolution failed).
    Summary(PlaceSummary),
    /// Fully resolved details.
    Detail(PlaceDetail),
}

impl SelectedPlace {
    /// Identifier of the selected place.
    #[must_use]
    pub const fn id(&self) -> &PlaceId {
        match self {
            Self::Summary(summary) => &summary.id,
            Self::Detail(detail) => detail.id(),
        }
    }

    /// Location used as the directions destination.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        match self {
            Self::Summary(summary) => summary.coordinate,
            Self::Detail(detail) => detail.summary.coordinate,
        }
    }

    /// Return whether details have been resolved.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Detail(_))
    }
}
