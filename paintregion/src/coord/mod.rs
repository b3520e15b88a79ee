//! Coordinate math module
//!
//! Provides the Web Mercator ground-resolution relation used to turn a brush
//! radius in screen pixels into meters, and the great-circle destination
//! formula used to place stamp vertices around a center point.

mod types;

pub use types::{
    CoordError, GeoPoint, EARTH_CIRCUMFERENCE_METERS, EARTH_RADIUS_METERS, MAX_LAT, MAX_LON,
    MIN_LAT, MIN_LON,
};

use std::f64::consts::PI;

/// Ground distance in meters covered by one screen pixel.
///
/// Standard Web Mercator relation for 256-pixel tiles:
/// `C * |cos(lat)| / 2^(zoom + 8)`.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees
/// * `zoom` - Map zoom level
#[inline]
pub fn meters_per_pixel(lat: f64, zoom: u8) -> f64 {
    let lat_rad = lat * PI / 180.0;
    EARTH_CIRCUMFERENCE_METERS * lat_rad.cos().abs() / 2.0_f64.powi(zoom as i32 + 8)
}

/// Computes the point reached by travelling `distance_km` from `origin` along
/// the initial `bearing_deg` (clockwise from north) on a spherical Earth.
///
/// # Arguments
///
/// * `origin` - Starting point
/// * `distance_km` - Great-circle distance in kilometres
/// * `bearing_deg` - Initial bearing in degrees
#[inline]
pub fn destination(origin: GeoPoint, distance_km: f64, bearing_deg: f64) -> GeoPoint {
    let lat1 = origin.lat_radians();
    let lng1 = origin.lng_radians();
    let bearing = bearing_deg.to_radians();
    let angular = distance_km * 1000.0 / EARTH_RADIUS_METERS;

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lng2 = lng1
        + (bearing.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lng2.to_degrees(), lat2.to_degrees())
}

/// Great-circle distance between two points in kilometres (haversine).
#[cfg(test)]
pub(crate) fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat_radians().cos() * b.lat_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt()) * EARTH_RADIUS_METERS / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_per_pixel_at_equator_zoom_0() {
        // One 256px tile spans the whole circumference at zoom 0
        let mpp = meters_per_pixel(0.0, 0);
        assert!((mpp - EARTH_CIRCUMFERENCE_METERS / 256.0).abs() < 1e-6);
    }

    #[test]
    fn test_meters_per_pixel_halves_per_zoom() {
        let z10 = meters_per_pixel(45.0, 10);
        let z11 = meters_per_pixel(45.0, 11);
        assert!((z10 / z11 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_meters_per_pixel_shrinks_toward_poles() {
        let equator = meters_per_pixel(0.0, 12);
        let oslo = meters_per_pixel(59.91, 12);
        assert!(oslo < equator);
        // cos(60°) = 0.5
        let sixty = meters_per_pixel(60.0, 12);
        assert!((sixty / equator - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_meters_per_pixel_symmetric_hemispheres() {
        assert_eq!(meters_per_pixel(33.0, 9), meters_per_pixel(-33.0, 9));
    }

    #[test]
    fn test_destination_due_north() {
        let origin = GeoPoint::new(0.0, 0.0);
        let dest = destination(origin, 111.195, 0.0);

        // ~111.195 km per degree of latitude on the mean sphere
        assert!((dest.lat - 1.0).abs() < 1e-3, "lat was {}", dest.lat);
        assert!(dest.lng.abs() < 1e-9);
    }

    #[test]
    fn test_destination_due_east_at_equator() {
        let dest = destination(GeoPoint::new(10.0, 0.0), 111.195, 90.0);
        assert!((dest.lng - 11.0).abs() < 1e-3);
        assert!(dest.lat.abs() < 1e-9);
    }

    #[test]
    fn test_destination_zero_distance_is_origin() {
        let origin = GeoPoint::new(-74.006, 40.7128);
        let dest = destination(origin, 0.0, 137.0);
        assert!((dest.lat - origin.lat).abs() < 1e-12);
        assert!((dest.lng - origin.lng).abs() < 1e-12);
    }

    #[test]
    fn test_haversine_matches_destination_distance() {
        let origin = GeoPoint::new(9.99, 53.55); // Hamburg
        let dest = destination(origin, 2.5, 222.0);
        assert!((haversine_km(origin, dest) - 2.5).abs() < 1e-7);
    }

    #[test]
    fn test_geo_point_try_new_rejects_bad_latitude() {
        assert!(matches!(
            GeoPoint::try_new(0.0, 91.0),
            Err(CoordError::InvalidLatitude(_))
        ));
        assert!(matches!(
            GeoPoint::try_new(0.0, f64::NAN),
            Err(CoordError::InvalidLatitude(_))
        ));
        assert!(matches!(
            GeoPoint::try_new(f64::INFINITY, 0.0),
            Err(CoordError::InvalidLongitude(_))
        ));
        assert!(GeoPoint::try_new(181.0, 45.0).is_ok());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_meters_per_pixel_non_negative(
                lat in -90.0..90.0_f64,
                zoom in 0u8..=22
            ) {
                let mpp = meters_per_pixel(lat, zoom);
                prop_assert!(mpp >= 0.0);
                prop_assert!(mpp <= EARTH_CIRCUMFERENCE_METERS / 256.0);
            }

            #[test]
            fn test_destination_preserves_distance(
                lng in -179.0..179.0_f64,
                lat in -80.0..80.0_f64,
                distance_km in 0.001..50.0_f64,
                bearing in 0.0..360.0_f64
            ) {
                let origin = GeoPoint::new(lng, lat);
                let dest = destination(origin, distance_km, bearing);
                let measured = haversine_km(origin, dest);
                prop_assert!(
                    (measured - distance_km).abs() < 1e-6,
                    "Expected {} km, measured {} km",
                    distance_km, measured
                );
            }
        }
    }
}
