//! Geographic coordinates and distance calculations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres, used by the haversine distance.
const EARTH_RADIUS_METRES: f64 = 6_371_000.0;

/// Errors raised when constructing a [`GeoPoint`] from raw coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoValidationError {
    /// Longitude is not a finite number in `[-180, 180]`.
    LongitudeOutOfRange { value: f64 },
    /// Latitude is not a finite number in `[-90, 90]`.
    LatitudeOutOfRange { value: f64 },
}

impl fmt::Display for GeoValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LongitudeOutOfRange { value } => write!(
                f,
                "longitude must be a finite number between -180 and 180 (got {value})"
            ),
            Self::LatitudeOutOfRange { value } => write!(
                f,
                "latitude must be a finite number between -90 and 90 (got {value})"
            ),
        }
    }
}

impl std::error::Error for GeoValidationError {}

/// A validated WGS84 coordinate pair.
///
/// # Examples
/// ```
/// use catalog::domain::GeoPoint;
///
/// let greenwich = GeoPoint::new(0.0, 51.4769)?;
/// let invalid = GeoPoint::new(-200.0, 51.4769);
/// assert!(invalid.is_err());
/// # _ = greenwich;
/// # Ok::<(), catalog::domain::GeoValidationError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoPointDraft")]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

/// Raw coordinate pair accepted from callers before validation.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
struct GeoPointDraft {
    longitude: f64,
    latitude: f64,
}

impl TryFrom<GeoPointDraft> for GeoPoint {
    type Error = GeoValidationError;

    fn try_from(draft: GeoPointDraft) -> Result<Self, Self::Error> {
        Self::new(draft.longitude, draft.latitude)
    }
}

impl GeoPoint {
    /// Validate a longitude and latitude pair.
    ///
    /// # Errors
    ///
    /// Returns a [`GeoValidationError`] naming the offending coordinate when
    /// either value is non-finite or outside its legal range.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeoValidationError> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoValidationError::LongitudeOutOfRange { value: longitude });
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoValidationError::LatitudeOutOfRange { value: latitude });
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Longitude in degrees east of the prime meridian.
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude in degrees north of the equator.
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Great-circle distance to `other` in metres, by the haversine formula.
    pub fn distance_metres(&self, other: &GeoPoint) -> f64 {
        let lat_a = self.latitude.to_radians();
        let lat_b = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lng = (other.longitude - self.longitude).to_radians();

        let half_chord = (d_lat / 2.0).sin().powi(2)
            + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
        let angle = 2.0 * half_chord.sqrt().asin();
        EARTH_RADIUS_METRES * angle
    }
}

/// A validated coordinate pair with its human-readable address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LocationDraft")]
pub struct Location {
    #[serde(flatten)]
    point: GeoPoint,
    address: String,
}

/// Raw location fields accepted from callers before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LocationDraft {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Street address or similar human-readable place description.
    pub address: String,
}

impl TryFrom<LocationDraft> for Location {
    type Error = GeoValidationError;

    fn try_from(draft: LocationDraft) -> Result<Self, Self::Error> {
        let point = GeoPoint::new(draft.longitude, draft.latitude)?;
        Ok(Self {
            point,
            address: draft.address,
        })
    }
}

impl Location {
    /// Build a location from an already-validated point.
    pub(crate) fn from_parts(point: GeoPoint, address: String) -> Self {
        Self { point, address }
    }

    /// The validated coordinate pair.
    pub const fn point(&self) -> GeoPoint {
        self.point
    }

    /// The human-readable address.
    pub fn address(&self) -> &str {
        self.address.as_str()
    }
}
