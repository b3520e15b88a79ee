//! Region accumulation.
//!
//! The [`RegionAccumulator`] owns the painted region and applies stamps to
//! it: union for drawing, difference for erasing. Every change is handed in
//! full to a [`RegionPublisher`], which replaces whatever it was displaying.
//!
//! # Failure semantics
//!
//! A stamp that the geometry engine cannot process is rejected with
//! [`AccumulatorError::StampRejected`] and the region keeps its last good
//! value. Nothing is ever partially applied.
//!
//! # Degenerate cases
//!
//! - Draw or erase with an empty stamp: no-op, nothing published.
//! - Draw on an empty region: the stamp becomes the region.
//! - Draw a stamp already covered by the region: region unchanged.
//! - Erase on an empty region: no-op, nothing published.
//! - Erase a stamp that misses the region: region unchanged.
//! - Erase a stamp that covers the region: region becomes empty.
//!
//! Coverage is decided per stamp. A draw keeps the current geometry when the
//! part of the stamp outside the region is below [`STAMP_RESIDUE_SHARE`] of
//! the stamp's own area; an erase keeps it when the stamp does not intersect
//! the region, or overlaps it by less than that share. The engine snaps
//! vertices to a fixed grid, so a stamp that was already unioned in can leave
//! slivers along the boundary that no pointer position could produce.

use thiserror::Error;
use tracing::{debug, warn};

use crate::region::{GeometryError, Region};

/// Share of a stamp's own area below which its uncovered (draw) or
/// overlapping (erase) part is treated as engine rounding.
pub const STAMP_RESIDUE_SHARE: f64 = 1e-6;

/// Receives the full region after every change.
///
/// Implementations render, store or forward the region. They get no write
/// access to the accumulator.
pub trait RegionPublisher {
    /// Replace the displayed region with `region`.
    fn publish(&mut self, region: &Region);
}

impl<F> RegionPublisher for F
where
    F: FnMut(&Region),
{
    fn publish(&mut self, region: &Region) {
        self(region)
    }
}

/// Publisher that discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPublisher;

impl RegionPublisher for NullPublisher {
    fn publish(&mut self, _region: &Region) {}
}

/// Errors from applying geometry to the accumulator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccumulatorError {
    /// The geometry engine could not combine the stamp with the region.
    #[error("Stamp rejected: {0}")]
    StampRejected(#[source] GeometryError),

    /// Externally supplied region data is malformed.
    #[error("Invalid region data: {0}")]
    InvalidGeometry(#[source] GeometryError),
}

/// Owner of the accumulated region.
pub struct RegionAccumulator {
    region: Region,
    publisher: Box<dyn RegionPublisher>,
    revision: u64,
}

impl std::fmt::Debug for RegionAccumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionAccumulator")
            .field("region", &self.region)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Default for RegionAccumulator {
    fn default() -> Self {
        Self::new(NullPublisher)
    }
}

impl RegionAccumulator {
    /// Create an accumulator with an empty region.
    pub fn new(publisher: impl RegionPublisher + 'static) -> Self {
        Self {
            region: Region::Empty,
            publisher: Box::new(publisher),
            revision: 0,
        }
    }

    /// The current region.
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Number of times the region has been published.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Union `stamp` into the region. No-op for an empty stamp.
    pub fn apply_draw(&mut self, stamp: &Region) -> Result<&Region, AccumulatorError> {
        if stamp.is_empty() {
            return Ok(&self.region);
        }
        stamp.validate().map_err(reject)?;

        let next = if self.region.is_empty() {
            stamp.clone()
        } else if self.covers(stamp)? {
            self.region.clone()
        } else {
            self.region.union(stamp).map_err(reject)?
        };
        self.commit(next, "draw");
        Ok(&self.region)
    }

    /// Subtract `stamp` from the region. No-op on an empty region or with an
    /// empty stamp.
    pub fn apply_erase(&mut self, stamp: &Region) -> Result<&Region, AccumulatorError> {
        if self.region.is_empty() || stamp.is_empty() {
            return Ok(&self.region);
        }
        stamp.validate().map_err(reject)?;

        let next = if self.misses(stamp)? {
            self.region.clone()
        } else {
            self.region.difference(stamp).map_err(reject)?
        };
        self.commit(next, "erase");
        Ok(&self.region)
    }

    /// Drop the region unconditionally.
    pub fn clear(&mut self) -> &Region {
        self.commit(Region::Empty, "clear");
        &self.region
    }

    /// Install externally supplied region data.
    ///
    /// Malformed data is rejected and the current region kept.
    pub fn replace(&mut self, region: Region) -> Result<&Region, AccumulatorError> {
        region
            .validate()
            .map_err(AccumulatorError::InvalidGeometry)?;
        self.commit(region, "replace");
        Ok(&self.region)
    }

    /// Whether the region already contains all of `stamp` worth drawing.
    fn covers(&self, stamp: &Region) -> Result<bool, AccumulatorError> {
        if !self.region.intersects(stamp) {
            return Ok(false);
        }
        let uncovered = stamp.difference(&self.region).map_err(reject)?;
        Ok(is_residue(&uncovered, stamp))
    }

    /// Whether erasing `stamp` would remove nothing from the region.
    fn misses(&self, stamp: &Region) -> Result<bool, AccumulatorError> {
        if !self.region.intersects(stamp) {
            return Ok(true);
        }
        let overlap = self.region.intersection(stamp).map_err(reject)?;
        Ok(is_residue(&overlap, stamp))
    }

    fn commit(&mut self, region: Region, operation: &'static str) {
        self.region = region;
        self.revision += 1;
        debug!(
            operation,
            revision = self.revision,
            polygons = self.region.polygon_count(),
            vertices = self.region.vertex_count(),
            "Region updated"
        );
        self.publisher.publish(&self.region);
    }
}

fn is_residue(part: &Region, stamp: &Region) -> bool {
    part.area() <= stamp.area() * STAMP_RESIDUE_SHARE
}

fn reject(error: GeometryError) -> AccumulatorError {
    warn!(error = %error, "Stamp rejected, region unchanged");
    AccumulatorError::StampRejected(error)
}
