//! Device geolocation with a fixed timeout.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::ports::{Geolocation, GeolocationError, PositionFix};
use super::{Center, FinderError};

/// Longest wait for a position fix.
pub const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Acquires fresh device positions.
pub struct Locator {
    geolocation: Arc<dyn Geolocation>,
    timeout: Duration,
}

impl Locator {
    /// Locator using [`GEOLOCATION_TIMEOUT`].
    #[must_use]
    pub const fn new(geolocation: Arc<dyn Geolocation>) -> Self {
        Self::with_timeout(geolocation, GEOLOCATION_TIMEOUT)
    }

    /// Locator with an explicit timeout.
    #[must_use]
    pub const fn with_timeout(geolocation: Arc<dyn Geolocation>, timeout: Duration) -> Self {
        Self {
            geolocation,
            timeout,
        }
    }

    /// Acquire a fresh position fix.
    ///
    /// # Errors
    /// Returns [`FinderError::GeolocationFailed`] when permission is denied,
    /// no source is available, or no fix arrives within the timeout.
    pub async fn fix(&self) -> Result<PositionFix, FinderError> {
        let outcome = tokio::time::timeout(self.timeout, self.geolocation.current_position())
            .await
            .unwrap_or_else(|_| {
                Err(GeolocationError::timeout(format!(
                    "no fix within {}s",
                    self.timeout.as_secs()
                )))
            });
        outcome
            .inspect(|position| {
                debug!(accuracy_metres = position.accuracy_metres, "position fix acquired");
            })
            .map_err(|error| {
                warn!(%error, "geolocation failed");
                FinderError::geolocation_failed(&error)
            })
    }

    /// Acquire a fresh fix as a device-derived map center.
    ///
    /// # Errors
    /// See [`Locator::fix`].
    pub async fn locate(&self) -> Result<Center, FinderError> {
        let fix = self.fix().await?;
        Ok(Center::from_device(fix.coordinate, fix.accuracy_metres))
    }
}
