//! Pixel-to-ground distance correction.
//!
//! The brush radius is specified in screen pixels. The ground distance one
//! pixel covers depends on zoom and, in Web Mercator, on latitude. The
//! corrector computes the factor once per zoom level and reuses it for the
//! lifetime of the instance.
//!
//! # Cache semantics
//!
//! Latitude is only consulted the first time a zoom level is seen. Later
//! calls at the same zoom return the cached value even if the brush has moved
//! north or south, so stamps at one zoom level share a ground radius.

use std::collections::HashMap;

use tracing::debug;

use crate::coord;

/// Memoizing meters-per-pixel converter.
///
/// Each accumulator pipeline owns its own corrector; there is no shared
/// global cache.
#[derive(Debug, Default, Clone)]
pub struct DistanceCorrector {
    /// Zoom level → meters per pixel. Append-only.
    cache: HashMap<u8, f64>,
}

impl DistanceCorrector {
    /// Create a corrector with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Meters per screen pixel at `zoom`.
    ///
    /// On first use of `zoom` the factor is computed at `lat` and cached.
    pub fn meters_per_pixel(&mut self, lat: f64, zoom: u8) -> f64 {
        *self.cache.entry(zoom).or_insert_with(|| {
            let mpp = coord::meters_per_pixel(lat, zoom);
            debug!(zoom, lat, mpp, "Cached ground resolution for zoom level");
            mpp
        })
    }

    /// Convert a radius in pixels to kilometres at `zoom`.
    pub fn radius_km(&mut self, lat: f64, zoom: u8, radius_pixels: f64) -> f64 {
        self.meters_per_pixel(lat, zoom) * radius_pixels / 1000.0
    }

    /// The cached factor for `zoom`, if it has been computed.
    pub fn cached(&self, zoom: u8) -> Option<f64> {
        self.cache.get(&zoom).copied()
    }

    /// Number of zoom levels cached so far.
    pub fn cached_zoom_levels(&self) -> usize {
        self.cache.len()
    }
}
