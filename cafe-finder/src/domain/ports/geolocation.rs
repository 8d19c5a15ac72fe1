//! Driven port for device geolocation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::define_port_error;
use crate::domain::Coordinate;

/// One position fix from the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    /// Reported position.
    pub coordinate: Coordinate,
    /// Accuracy radius in metres.
    pub accuracy_metres: f64,
    /// When the fix was taken.
    pub fixed_at: DateTime<Utc>,
}

define_port_error! {
    /// Errors surfaced while acquiring a position.
    pub enum GeolocationError {
        /// The user or platform refused location access.
        PermissionDenied {
            /// Human-readable cause.
            message: String,
        } => "location permission denied: {message}",
        /// No position source is available.
        Unavailable {
            /// Human-readable cause.
            message: String,
        } => "location unavailable: {message}",
        /// No fix arrived within the timeout.
        Timeout {
            /// Human-readable cause.
            message: String,
        } => "location timeout: {message}",
    }
}

/// Port for reading the device's current position.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geolocation: Send + Sync {
    /// Acquire a fresh fix; cached positions must not be returned.
    async fn current_position(&self) -> Result<PositionFix, GeolocationError>;
}
