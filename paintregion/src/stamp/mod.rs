//! Brush stamp construction.
//!
//! A stamp is the circular polygon covered by the brush at one pointer
//! position. Vertices are placed on a great circle around the center at a
//! fixed angular step, so the stamp looks round on the map at any latitude.

use geo::{Coord, LineString, Polygon};

use crate::coord::{self, GeoPoint};
use crate::distance::DistanceCorrector;
use crate::region::Region;

/// Default number of vertices around a stamp.
pub const DEFAULT_STAMP_STEPS: usize = 64;

/// Fewest vertices that still form a polygon.
pub const MIN_STAMP_STEPS: usize = 3;

/// Builds circular stamp polygons.
#[derive(Debug, Clone, Copy)]
pub struct StampBuilder {
    steps: usize,
}

impl Default for StampBuilder {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STAMP_STEPS,
        }
    }
}

impl StampBuilder {
    /// Create a builder with the given vertex count (raised to the minimum).
    pub fn new(steps: usize) -> Self {
        Self {
            steps: steps.max(MIN_STAMP_STEPS),
        }
    }

    /// Number of vertices per stamp.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Build the stamp for a brush of `radius_pixels` centered on `center`.
    ///
    /// The ground radius comes from `corrector` at the center's latitude.
    /// Zero, negative or non-finite radii and non-finite centers produce
    /// [`Region::Empty`] without touching the corrector's cache.
    pub fn build(
        &self,
        corrector: &mut DistanceCorrector,
        center: GeoPoint,
        zoom: u8,
        radius_pixels: f64,
    ) -> Region {
        if !radius_pixels.is_finite()
            || radius_pixels <= 0.0
            || !center.lat.is_finite()
            || !center.lng.is_finite()
        {
            return Region::Empty;
        }
        let radius_km = corrector.radius_km(center.lat, zoom, radius_pixels);
        self.circle(center, radius_km)
    }

    /// Circle of `radius_km` around `center` as a closed polygon.
    pub fn circle(&self, center: GeoPoint, radius_km: f64) -> Region {
        if !radius_km.is_finite()
            || radius_km <= 0.0
            || !center.lat.is_finite()
            || !center.lng.is_finite()
        {
            return Region::Empty;
        }

        let mut ring: Vec<Coord<f64>> = (0..self.steps)
            .map(|i| {
                let bearing = i as f64 * -360.0 / self.steps as f64;
                coord::destination(center, radius_km, bearing).into()
            })
            .collect();
        ring.push(ring[0]);

        Region::Polygon(Polygon::new(LineString::new(ring), vec![]))
    }
}
