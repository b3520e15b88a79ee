//! GeoJSON interchange for regions.
//!
//! Only the subset needed to exchange painted areas is modelled:
//! `Polygon`, `MultiPolygon`, `Feature` and `FeatureCollection`. Positions
//! are `[lng, lat]` arrays; extra components (altitude) are accepted and
//! ignored on input.
//!
//! Loading a `FeatureCollection` unions all of its features into one region,
//! which is how externally supplied data is combined with a painted area.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::{CoordError, GeoPoint};
use crate::region::{GeometryError, Region, MIN_RING_LEN};

/// A single GeoJSON position.
pub type Position = Vec<f64>;

/// Errors converting GeoJSON into a [`Region`].
#[derive(Debug, Error)]
pub enum GeoJsonError {
    /// Document is not valid JSON or does not match the schema.
    #[error("Invalid GeoJSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// A position has fewer than two components.
    #[error("Position has {0} components (need at least 2)")]
    ShortPosition(usize),

    /// A position is outside valid geographic bounds.
    #[error("Invalid position: {0}")]
    Coordinate(#[from] CoordError),

    /// A ring has fewer than four positions.
    #[error("Ring has {0} positions (minimum 4)")]
    ShortRing(usize),

    /// A ring's first and last positions differ.
    #[error("Ring is not closed")]
    UnclosedRing,

    /// A polygon has no exterior ring.
    #[error("Polygon has no rings")]
    MissingExterior,

    /// Combining features failed.
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

/// GeoJSON object, tagged by its `type` member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    Feature {
        geometry: Option<Box<GeoJson>>,
        #[serde(default)]
        properties: Option<serde_json::Value>,
    },
    FeatureCollection {
        features: Vec<GeoJson>,
    },
}

impl GeoJson {
    /// Parse a GeoJSON document.
    pub fn from_json(json: &str) -> Result<Self, GeoJsonError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to a compact JSON string.
    pub fn to_json(&self) -> Result<String, GeoJsonError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to an indented JSON string.
    pub fn to_json_pretty(&self) -> Result<String, GeoJsonError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// An empty `FeatureCollection`, the export form of an empty region.
    pub fn empty_collection() -> Self {
        GeoJson::FeatureCollection {
            features: Vec::new(),
        }
    }

    /// Wrap a geometry in a `Feature` with null properties.
    pub fn into_feature(self) -> Self {
        match self {
            feature @ (GeoJson::Feature { .. } | GeoJson::FeatureCollection { .. }) => feature,
            geometry => GeoJson::Feature {
                geometry: Some(Box::new(geometry)),
                properties: None,
            },
        }
    }

    /// Convert to a validated region.
    ///
    /// Features without geometry contribute nothing. Collections are unioned.
    pub fn to_region(&self) -> Result<Region, GeoJsonError> {
        match self {
            GeoJson::Polygon { coordinates } => Ok(Region::from(polygon_from_rings(coordinates)?)),
            GeoJson::MultiPolygon { coordinates } => {
                let polygons = coordinates
                    .iter()
                    .map(|rings| polygon_from_rings(rings))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Region::from(MultiPolygon::new(polygons)))
            }
            GeoJson::Feature { geometry, .. } => match geometry {
                Some(geometry) => geometry.to_region(),
                None => Ok(Region::Empty),
            },
            GeoJson::FeatureCollection { features } => {
                features.iter().try_fold(Region::Empty, |acc, feature| -> Result<Region, GeoJsonError> {
                    let region = feature.to_region()?;
                    Ok(acc.union(&region)?)
                })
            }
        }
    }

    /// Export a region. Empty regions become `None`.
    pub fn from_region(region: &Region) -> Option<Self> {
        match region {
            Region::Empty => None,
            Region::Polygon(polygon) => Some(GeoJson::Polygon {
                coordinates: polygon_to_rings(polygon),
            }),
            Region::MultiPolygon(multi) if multi.0.is_empty() => None,
            Region::MultiPolygon(multi) => Some(GeoJson::MultiPolygon {
                coordinates: multi.0.iter().map(polygon_to_rings).collect(),
            }),
        }
    }
}

impl TryFrom<&GeoJson> for Region {
    type Error = GeoJsonError;

    fn try_from(value: &GeoJson) -> Result<Self, Self::Error> {
        value.to_region()
    }
}

fn polygon_from_rings(rings: &[Vec<Position>]) -> Result<Polygon<f64>, GeoJsonError> {
    let (exterior, interiors) = rings.split_first().ok_or(GeoJsonError::MissingExterior)?;
    let exterior = ring_from_positions(exterior)?;
    let interiors = interiors
        .iter()
        .map(|ring| ring_from_positions(ring))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn ring_from_positions(positions: &[Position]) -> Result<LineString<f64>, GeoJsonError> {
    if positions.len() < MIN_RING_LEN {
        return Err(GeoJsonError::ShortRing(positions.len()));
    }
    let coords = positions
        .iter()
        .map(|position| -> Result<Coord<f64>, GeoJsonError> {
            match position.as_slice() {
                [lng, lat, ..] => Ok(Coord::from(GeoPoint::try_new(*lng, *lat)?)),
                short => Err(GeoJsonError::ShortPosition(short.len())),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    if coords.first() != coords.last() {
        return Err(GeoJsonError::UnclosedRing);
    }
    Ok(LineString::new(coords))
}

fn polygon_to_rings(polygon: &Polygon<f64>) -> Vec<Vec<Position>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| ring.0.iter().map(|c| vec![c.x, c.y]).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"{
        "type": "Polygon",
        "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]
    }"#;

    #[test]
    fn test_parse_polygon() {
        let geojson = GeoJson::from_json(SQUARE).unwrap();
        let region = geojson.to_region().unwrap();

        assert_eq!(region.polygon_count(), 1);
        assert!((region.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_ignores_altitude() {
        let json = r#"{"type":"Polygon","coordinates":[[[0,0,5],[1,0,5],[1,1,5],[0,0,5]]]}"#;
        let region = GeoJson::from_json(json).unwrap().to_region().unwrap();
        assert!((region.area() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_feature_collection_is_unioned() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"name": "a"},
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0],[2,0],[2,2],[0,2],[0,0]]]}},
                {"type": "Feature", "properties": null,
                 "geometry": {"type": "Polygon", "coordinates": [[[1,1],[3,1],[3,3],[1,3],[1,1]]]}},
                {"type": "Feature", "geometry": null}
            ]
        }"#;
        let region = GeoJson::from_json(json).unwrap().to_region().unwrap();

        assert_eq!(region.polygon_count(), 1);
        assert!((region.area() - 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_unclosed_ring() {
        let json = r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1]]]}"#;
        let err = GeoJson::from_json(json).unwrap().to_region().unwrap_err();
        assert!(matches!(err, GeoJsonError::UnclosedRing));
    }

    #[test]
    fn test_rejects_short_ring_and_position() {
        let json = r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[0,0]]]}"#;
        let err = GeoJson::from_json(json).unwrap().to_region().unwrap_err();
        assert!(matches!(err, GeoJsonError::ShortRing(3)));

        let json = r#"{"type":"Polygon","coordinates":[[[0,0],[1],[1,1],[0,0]]]}"#;
        let err = GeoJson::from_json(json).unwrap().to_region().unwrap_err();
        assert!(matches!(err, GeoJsonError::ShortPosition(1)));
    }

    #[test]
    fn test_rejects_out_of_range_latitude() {
        let json = r#"{"type":"Polygon","coordinates":[[[0,0],[1,95],[1,1],[0,0]]]}"#;
        let err = GeoJson::from_json(json).unwrap().to_region().unwrap_err();
        assert!(matches!(err, GeoJsonError::Coordinate(_)));
    }

    #[test]
    fn test_rejects_unknown_type() {
        let json = r#"{"type":"Point","coordinates":[0,0]}"#;
        assert!(matches!(
            GeoJson::from_json(json),
            Err(GeoJsonError::Json(_))
        ));
    }

    #[test]
    fn test_export_empty_region_is_none() {
        assert_eq!(GeoJson::from_region(&Region::Empty), None);
    }

    #[test]
    fn test_export_polygon_matches_input() {
        let geojson = GeoJson::from_json(SQUARE).unwrap();
        let region = geojson.to_region().unwrap();

        assert_eq!(GeoJson::from_region(&region), Some(geojson));
    }

    #[test]
    fn test_export_serializes_type_tag() {
        let region = GeoJson::from_json(SQUARE).unwrap().to_region().unwrap();
        let json = GeoJson::from_region(&region).unwrap().to_json().unwrap();

        assert!(json.starts_with(r#"{"type":"Polygon","coordinates":"#));
    }

    #[test]
    fn test_into_feature_serializes_null_properties() {
        let feature = GeoJson::from_json(SQUARE).unwrap().into_feature();
        let value: serde_json::Value = serde_json::from_str(&feature.to_json().unwrap()).unwrap();

        assert_eq!(value["type"], "Feature");
        assert!(value["properties"].is_null());
        assert_eq!(value["geometry"]["type"], "Polygon");
    }
}
