//! Brush event types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coord::GeoPoint;

/// What a brush application does to the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushMode {
    /// Union the stamp into the region.
    Draw,
    /// Subtract the stamp from the region.
    Erase,
}

impl BrushMode {
    /// Get a short name for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            BrushMode::Draw => "draw",
            BrushMode::Erase => "erase",
        }
    }
}

impl fmt::Display for BrushMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One brush application at one pointer position.
///
/// The mode is captured when the event is created, so switching modes later
/// does not affect events already queued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushEvent {
    /// Brush center.
    pub position: GeoPoint,
    /// Map zoom level at the time of the event.
    pub zoom: u8,
    /// Brush radius in screen pixels.
    pub radius_pixels: f64,
    /// Draw or erase.
    pub mode: BrushMode,
}

impl BrushEvent {
    /// Create an event.
    pub fn new(position: GeoPoint, zoom: u8, radius_pixels: f64, mode: BrushMode) -> Self {
        Self {
            position,
            zoom,
            radius_pixels,
            mode,
        }
    }

    /// Create a draw event.
    pub fn draw(position: GeoPoint, zoom: u8, radius_pixels: f64) -> Self {
        Self::new(position, zoom, radius_pixels, BrushMode::Draw)
    }

    /// Create an erase event.
    pub fn erase(position: GeoPoint, zoom: u8, radius_pixels: f64) -> Self {
        Self::new(position, zoom, radius_pixels, BrushMode::Erase)
    }
}

/// Position of an item in the sequencer's arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
