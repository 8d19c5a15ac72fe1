//! Search inputs owned by the presentation layer: category and filters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Coordinate;

/// Smallest radius the radius slider offers, in metres.
pub const MIN_RADIUS_METRES: u32 = 250;
/// Largest radius the provider accepts for this client, in metres.
pub const MAX_RADIUS_METRES: u32 = 5_000;
/// Radius used until the user moves the slider.
pub const DEFAULT_RADIUS_METRES: u32 = 1_500;
/// Hard cap on the number of summaries exposed for one search.
pub const MAX_RESULTS: usize = 60;

/// Default map center (Lucknow) used before any geolocation or search.
pub const DEFAULT_LOCATION: Coordinate = Coordinate::from_trusted_parts(26.8467, 80.9462);

/// Place category searched for; one per navigation tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Coffee shops (`cafes` tab).
    #[default]
    Cafe,
    /// Restaurants (`restaurants` tab).
    Restaurant,
    /// Tourist attractions (`tourist` tab).
    TouristAttraction,
}

impl Category {
    /// Every category in tab order.
    pub const ALL: [Self; 3] = [Self::Cafe, Self::Restaurant, Self::TouristAttraction];

    /// Provider place type used as the primary-type restriction.
    #[must_use]
    pub const fn provider_type(self) -> &'static str {
        match self {
            Self::Cafe => "cafe",
            Self::Restaurant => "restaurant",
            Self::TouristAttraction => "tourist_attraction",
        }
    }

    /// Navigation tab key for this category.
    #[must_use]
    pub const fn tab_key(self) -> &'static str {
        match self {
            Self::Cafe => "cafes",
            Self::Restaurant => "restaurants",
            Self::TouristAttraction => "tourist",
        }
    }

    /// Resolve a navigation tab key.
    #[must_use]
    pub fn from_tab_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.tab_key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.provider_type())
    }
}

/// Error returned when parsing an unknown category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category `{0}`; expected cafe, restaurant, or tourist_attraction")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.provider_type() == trimmed)
            .or_else(|| Self::from_tab_key(trimmed))
            .ok_or_else(|| UnknownCategory(trimmed.to_owned()))
    }
}

/// Filter state passed by value into every search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Search radius in metres.
    pub radius_metres: u32,
    /// Only keep places currently open.
    pub open_now: bool,
    /// Minimum rating; `0.0` disables the filter.
    pub min_rating: f64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            radius_metres: DEFAULT_RADIUS_METRES,
            open_now: false,
            min_rating: 0.0,
        }
    }
}

impl FilterState {
    /// Radius clamped into the provider-supported range.
    ///
    /// # Examples
    /// ```
    /// use cafe_finder::domain::FilterState;
    ///
    /// let filters = FilterState { radius_metres: 90_000, ..FilterState::default() };
    /// assert_eq!(filters.effective_radius(), 5_000);
    /// ```
    #[must_use]
    pub fn effective_radius(&self) -> u32 {
        self.radius_metres.clamp(MIN_RADIUS_METRES, MAX_RADIUS_METRES)
    }

    /// Minimum rating clamped into `[0, 5]`; non-finite values disable it.
    #[must_use]
    pub const fn effective_min_rating(&self) -> f64 {
        if self.min_rating.is_finite() {
            self.min_rating.clamp(0.0, 5.0)
        } else {
            0.0
        }
    }

    /// Copy of the filters with every field normalised.
    #[must_use]
    pub fn normalised(self) -> Self {
        Self {
            radius_metres: self.effective_radius(),
            open_now: self.open_now,
            min_rating: self.effective_min_rating(),
        }
    }

    /// Return whether a place with `rating` passes the minimum-rating filter.
    ///
    /// A missing rating counts as zero.
    #[must_use]
    pub fn admits_rating(&self, rating: Option<f64>) -> bool {
        let threshold = self.effective_min_rating();
        threshold <= 0.0 || rating.unwrap_or(0.0) >= threshold
    }

    /// Return whether a place with the given open-now flag passes.
    ///
    /// Places whose opening state is unknown are dropped while the filter is on.
    #[must_use]
    pub fn admits_open_state(&self, open_now: Option<bool>) -> bool {
        !self.open_now || open_now == Some(true)
    }
}
