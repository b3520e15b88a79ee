//! The accumulated painted area.
//!
//! A [`Region`] is either nothing yet, a single polygon, or several disjoint
//! polygons. Union and difference are defined over every combination of the
//! three, with the empty region acting as the identity for union and the
//! absorbing element for difference.
//!
//! Boolean operations are delegated to the `geo` crate. Inputs and outputs
//! are validated so that a malformed operand is reported as a
//! [`GeometryError`] instead of silently producing a corrupt shape.

use geo::{
    Area, BooleanOps, Contains, Coord, Intersects, LineString, MultiPolygon, Point, Polygon,
};
use thiserror::Error;

use crate::coord::GeoPoint;

/// Fewest coordinates in a closed ring (triangle plus closing point).
pub const MIN_RING_LEN: usize = 4;

/// Errors reported for malformed region geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A coordinate is NaN or infinite.
    #[error("Non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },

    /// A ring has too few positions to enclose any area.
    #[error("Ring has {len} positions (minimum 4)")]
    RingTooShort { len: usize },
}

/// A polygonal area in geographic (lng, lat) coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Region {
    /// No region yet.
    #[default]
    Empty,
    /// One connected polygon, possibly with holes.
    Polygon(Polygon<f64>),
    /// Two or more disjoint polygons.
    MultiPolygon(MultiPolygon<f64>),
}

impl Region {
    /// Build a region from an engine result, collapsing to the tightest variant.
    ///
    /// Polygons whose exterior ring cannot enclose area are dropped.
    pub fn from_multi_polygon(multi: MultiPolygon<f64>) -> Self {
        let mut polygons: Vec<Polygon<f64>> = multi
            .0
            .into_iter()
            .filter(|p| p.exterior().0.len() >= MIN_RING_LEN)
            .collect();

        match polygons.len() {
            0 => Region::Empty,
            1 => Region::Polygon(polygons.remove(0)),
            _ => Region::MultiPolygon(MultiPolygon::new(polygons)),
        }
    }

    /// True when no area has been painted.
    pub fn is_empty(&self) -> bool {
        match self {
            Region::Empty => true,
            Region::Polygon(_) => false,
            Region::MultiPolygon(mp) => mp.0.is_empty(),
        }
    }

    /// Number of disjoint polygons.
    pub fn polygon_count(&self) -> usize {
        match self {
            Region::Empty => 0,
            Region::Polygon(_) => 1,
            Region::MultiPolygon(mp) => mp.0.len(),
        }
    }

    /// Total number of ring coordinates, for diagnostics.
    pub fn vertex_count(&self) -> usize {
        self.polygons()
            .map(|p| {
                p.exterior().0.len() + p.interiors().iter().map(|r| r.0.len()).sum::<usize>()
            })
            .sum()
    }

    /// Planar area in square degrees. Empty regions have area 0.
    pub fn area(&self) -> f64 {
        match self {
            Region::Empty => 0.0,
            Region::Polygon(p) => p.unsigned_area(),
            Region::MultiPolygon(mp) => mp.unsigned_area(),
        }
    }

    /// Whether `point` lies strictly inside the region.
    pub fn contains(&self, point: GeoPoint) -> bool {
        let point = Point::new(point.lng, point.lat);
        match self {
            Region::Empty => false,
            Region::Polygon(p) => p.contains(&point),
            Region::MultiPolygon(mp) => mp.contains(&point),
        }
    }

    /// Iterate over the component polygons.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon<f64>> {
        let slice: &[Polygon<f64>] = match self {
            Region::Empty => &[],
            Region::Polygon(p) => std::slice::from_ref(p),
            Region::MultiPolygon(mp) => &mp.0,
        };
        slice.iter()
    }

    /// The region as a (possibly empty) multi-polygon.
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        MultiPolygon::new(self.polygons().cloned().collect())
    }

    /// Check every ring for finite coordinates and minimum length.
    ///
    /// Rings are always closed: `geo::Polygon::new` closes them on construction.
    pub fn validate(&self) -> Result<(), GeometryError> {
        for polygon in self.polygons() {
            validate_ring(polygon.exterior())?;
            for interior in polygon.interiors() {
                validate_ring(interior)?;
            }
        }
        Ok(())
    }

    /// Geometric union. Either side being empty returns the other unchanged.
    pub fn union(&self, other: &Region) -> Result<Region, GeometryError> {
        self.validate()?;
        other.validate()?;

        match (self, other) {
            (Region::Empty, _) => Ok(other.clone()),
            (_, Region::Empty) => Ok(self.clone()),
            _ => {
                let merged = self.to_multi_polygon().union(&other.to_multi_polygon());
                checked(Region::from_multi_polygon(merged))
            }
        }
    }

    /// Whether the two regions share any point, boundaries included.
    pub fn intersects(&self, other: &Region) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.to_multi_polygon().intersects(&other.to_multi_polygon())
    }

    /// Geometric intersection. Empty when either side is empty.
    pub fn intersection(&self, other: &Region) -> Result<Region, GeometryError> {
        self.validate()?;
        other.validate()?;

        if !self.intersects(other) {
            return Ok(Region::Empty);
        }
        let shared = self
            .to_multi_polygon()
            .intersection(&other.to_multi_polygon());
        checked(Region::from_multi_polygon(shared))
    }

    /// Geometric difference `self - other`. Subtracting from or with an empty
    /// region returns `self` unchanged.
    pub fn difference(&self, other: &Region) -> Result<Region, GeometryError> {
        self.validate()?;
        other.validate()?;

        if self.is_empty() || other.is_empty() {
            return Ok(self.clone());
        }
        let remaining = self
            .to_multi_polygon()
            .difference(&other.to_multi_polygon());
        checked(Region::from_multi_polygon(remaining))
    }
}

impl From<Polygon<f64>> for Region {
    fn from(polygon: Polygon<f64>) -> Self {
        Region::from_multi_polygon(MultiPolygon::new(vec![polygon]))
    }
}

impl From<MultiPolygon<f64>> for Region {
    fn from(multi: MultiPolygon<f64>) -> Self {
        Region::from_multi_polygon(multi)
    }
}

fn checked(region: Region) -> Result<Region, GeometryError> {
    region.validate()?;
    Ok(region)
}

fn validate_ring(ring: &LineString<f64>) -> Result<(), GeometryError> {
    let coords: &[Coord<f64>] = &ring.0;
    if coords.len() < MIN_RING_LEN {
        return Err(GeometryError::RingTooShort { len: coords.len() });
    }
    if let Some(bad) = coords.iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(GeometryError::NonFiniteCoordinate { x: bad.x, y: bad.y });
    }
    Ok(())
}
