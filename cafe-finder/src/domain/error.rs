//! Failure taxonomy shared by the finder components.
//!
//! Every provider failure is caught at the component that issued the call and
//! converted into one of these variants. None of them is fatal: the worst case
//! is a degraded view.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::PlaceId;

/// Banner shown while the provider credential is missing.
pub const MISSING_KEY_BANNER: &str =
    "Places API key missing: set CAFE_FINDER_API_KEY to enable search.";

/// Failures surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinderError {
    /// The provider client could not be initialised; search is disabled.
    #[error("{}", MISSING_KEY_BANNER)]
    InitializationFailed,
    /// A nearby or text search failed.
    #[error("search failed: {reason}")]
    QueryFailed {
        /// Human-readable cause.
        reason: String,
    },
    /// Details for a selected place could not be fetched.
    #[error("could not load details for {identifier}: {reason}")]
    DetailFetchFailed {
        /// Place whose details failed.
        identifier: PlaceId,
        /// Human-readable cause.
        reason: String,
    },
    /// The directions provider returned a failure status.
    #[error("directions failed: {status}")]
    DirectionsFailed {
        /// Provider status code.
        status: String,
    },
    /// Geolocation was denied, unavailable, or timed out.
    #[error("could not get your location: {reason}")]
    GeolocationFailed {
        /// Human-readable cause.
        reason: String,
    },
}

impl FinderError {
    /// Build a [`FinderError::QueryFailed`] from any displayable cause.
    #[must_use]
    pub fn query_failed(reason: &impl fmt::Display) -> Self {
        Self::QueryFailed {
            reason: reason.to_string(),
        }
    }

    /// Build a [`FinderError::GeolocationFailed`] from any displayable cause.
    #[must_use]
    pub fn geolocation_failed(reason: &impl fmt::Display) -> Self {
        Self::GeolocationFailed {
            reason: reason.to_string(),
        }
    }
}

/// Severity of a one-shot notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// Something the user asked for did not happen.
    Warning,
}

/// One-shot notification drained by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Display text.
    pub message: String,
}

impl Notice {
    /// Warning notice built from a finder error.
    #[must_use]
    pub fn from_error(error: &FinderError) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: error.to_string(),
        }
    }

    /// Informational notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_carries_the_error_text() {
        let notice = Notice::from_error(&FinderError::DirectionsFailed {
            status: "ZERO_RESULTS".to_owned(),
        });
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, "directions failed: ZERO_RESULTS");
    }

    #[test]
    fn initialisation_failure_renders_the_banner() {
        assert_eq!(
            FinderError::InitializationFailed.to_string(),
            MISSING_KEY_BANNER
        );
    }
}
