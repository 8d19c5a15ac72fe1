//! Coordinates, map centers, and great-circle helpers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const EARTH_RADIUS_METRES: f64 = 6_371_008.8;

/// WGS84 latitude/longitude pair.
///
/// ## Invariants
/// - Both components are finite.
/// - Latitude lies in `[-90, 90]`, longitude in `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoordinateDto", into = "CoordinateDto")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

/// Validation errors returned when constructing a [`Coordinate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoordinateValidationError {
    /// One component is NaN or infinite.
    #[error("coordinates must be finite")]
    NonFinite,
    /// Latitude is outside `[-90, 90]`.
    #[error("latitude must be within [-90, 90]")]
    LatitudeOutOfRange,
    /// Longitude is outside `[-180, 180]`.
    #[error("longitude must be within [-180, 180]")]
    LongitudeOutOfRange,
}

impl Coordinate {
    /// Build a validated coordinate.
    ///
    /// # Examples
    /// ```
    /// use cafe_finder::domain::Coordinate;
    ///
    /// let lucknow = Coordinate::new(26.8467, 80.9462).expect("valid");
    /// assert_eq!(lucknow.latitude(), 26.8467);
    /// assert!(Coordinate::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateValidationError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateValidationError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateValidationError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateValidationError::LongitudeOutOfRange);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a coordinate from literals known to be in range.
    pub(crate) const fn from_trusted_parts(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in metres (haversine).
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "haversine distance is floating-point trigonometry"
    )]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lng = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_METRES * c
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CoordinateDto {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<CoordinateDto> for Coordinate {
    type Error = CoordinateValidationError;

    fn try_from(value: CoordinateDto) -> Result<Self, Self::Error> {
        Self::new(value.latitude, value.longitude)
    }
}

impl From<Coordinate> for CoordinateDto {
    fn from(value: Coordinate) -> Self {
        Self {
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}

/// Map center together with its provenance.
///
/// A device-derived center drives the user-location marker and accuracy
/// circle; a center picked by search or panning does not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    /// Center coordinate.
    pub coordinate: Coordinate,
    /// Whether the coordinate came from device geolocation.
    pub from_device: bool,
    /// Accuracy radius in metres reported with a device fix.
    pub accuracy_metres: Option<f64>,
}

impl Center {
    /// Center chosen manually (search suggestion, map drag, default).
    #[must_use]
    pub const fn manual(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            from_device: false,
            accuracy_metres: None,
        }
    }

    /// Center derived from a geolocation fix.
    #[must_use]
    pub const fn from_device(coordinate: Coordinate, accuracy_metres: f64) -> Self {
        Self {
            coordinate,
            from_device: true,
            accuracy_metres: Some(accuracy_metres.max(0.0)),
        }
    }
}

/// Axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// South-west corner.
    pub south_west: Coordinate,
    /// North-east corner.
    pub north_east: Coordinate,
}

impl Bounds {
    /// Smallest box containing every coordinate, or `None` for an empty path.
    #[must_use]
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        let mut remaining = points.into_iter();
        let first = *remaining.next()?;
        let (mut south, mut west, mut north, mut east) = (
            first.latitude,
            first.longitude,
            first.latitude,
            first.longitude,
        );
        for point in remaining {
            south = south.min(point.latitude);
            north = north.max(point.latitude);
            west = west.min(point.longitude);
            east = east.max(point.longitude);
        }
        Some(Self {
            south_west: Coordinate {
                latitude: south,
                longitude: west,
            },
            north_east: Coordinate {
                latitude: north,
                longitude: east,
            },
        })
    }

    /// Return whether `point` lies inside the box (inclusive).
    #[must_use]
    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.south_west.latitude..=self.north_east.latitude).contains(&point.latitude)
            && (self.south_west.longitude..=self.north_east.longitude).contains(&point.longitude)
    }
}
