//! Core coordinate types and constants.

use std::fmt;

use thiserror::Error;

/// Equatorial circumference of the Earth in meters (WGS84).
pub const EARTH_CIRCUMFERENCE_METERS: f64 = 40_075_016.686;

/// Mean Earth radius in meters, used for great-circle vertex placement.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Minimum valid latitude.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude.
pub const MAX_LON: f64 = 180.0;

/// Errors from coordinate validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (must be finite)")]
    InvalidLongitude(f64),
}

/// A geographic position in degrees.
///
/// Stored in GeoJSON axis order: longitude first, latitude second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Longitude in degrees (east positive).
    pub lng: f64,
    /// Latitude in degrees (north positive).
    pub lat: f64,
}

impl GeoPoint {
    /// Create a point without validation.
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Create a point, rejecting non-finite values and latitudes off the globe.
    ///
    /// Longitudes outside [-180, 180] are accepted: a pointer dragged past the
    /// antimeridian on a wrapped map legitimately reports them.
    pub fn try_new(lng: f64, lat: f64) -> Result<Self, CoordError> {
        if !lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !lng.is_finite() {
            return Err(CoordError::InvalidLongitude(lng));
        }
        Ok(Self { lng, lat })
    }

    /// Latitude in radians.
    #[inline]
    pub fn lat_radians(&self) -> f64 {
        self.lat.to_radians()
    }

    /// Longitude in radians.
    #[inline]
    pub fn lng_radians(&self) -> f64 {
        self.lng.to_radians()
    }
}

impl From<GeoPoint> for geo::Coord<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::Coord {
            x: point.lng,
            y: point.lat,
        }
    }
}

impl From<geo::Coord<f64>> for GeoPoint {
    fn from(coord: geo::Coord<f64>) -> Self {
        Self {
            lng: coord.x,
            lat: coord.y,
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lng, self.lat)
    }
}
