//! Position sources for hosts without a live device fix.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::Coordinate;
use crate::domain::ports::{Geolocation, GeolocationError, PositionFix};

/// Reports the same position on every request, stamped with the clock.
pub struct FixedGeolocation {
    coordinate: Coordinate,
    accuracy_metres: f64,
    clock: Arc<dyn Clock>,
}

impl FixedGeolocation {
    /// Source pinned to `coordinate` with the given accuracy radius.
    #[must_use]
    pub const fn new(coordinate: Coordinate, accuracy_metres: f64, clock: Arc<dyn Clock>) -> Self {
        Self {
            coordinate,
            accuracy_metres: accuracy_metres.max(0.0),
            clock,
        }
    }
}

#[async_trait]
impl Geolocation for FixedGeolocation {
    async fn current_position(&self) -> Result<PositionFix, GeolocationError> {
        Ok(PositionFix {
            coordinate: self.coordinate,
            accuracy_metres: self.accuracy_metres,
            fixed_at: self.clock.utc(),
        })
    }
}

/// Source for hosts with no positioning at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableGeolocation;

#[async_trait]
impl Geolocation for UnavailableGeolocation {
    async fn current_position(&self) -> Result<PositionFix, GeolocationError> {
        Err(GeolocationError::unavailable(
            "geolocation is not supported on this host",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockClock;

    use crate::test_support::fixtures::{coordinate, fixed_instant};

    #[tokio::test]
    async fn fixed_source_stamps_each_fix_with_the_clock() {
        let mut clock = MockClock::new();
        clock.expect_utc().times(1).return_const(fixed_instant());
        let source = FixedGeolocation::new(coordinate(26.85, 80.94), -3.0, Arc::new(clock));

        let fix = source.current_position().await.expect("fix");

        assert_eq!(fix.fixed_at, fixed_instant());
        assert_eq!(fix.coordinate, coordinate(26.85, 80.94));
        assert!(fix.accuracy_metres.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unavailable_source_always_fails() {
        let err = UnavailableGeolocation
            .current_position()
            .await
            .expect_err("no source");
        assert!(matches!(err, GeolocationError::Unavailable { .. }));
    }
}
