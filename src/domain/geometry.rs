//! Geometry value types exchanged with the geometry engine.
//!
//! These mirror the REST JSON geometry shapes (`{x, y}`, `{paths}`, `{rings}`)
//! so engine adapters can pass them straight through. No computation lives
//! here beyond trivial accessors.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_wkid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkt: Option<String>,
}

impl SpatialReference {
    pub fn from_wkid(wkid: i64) -> Self {
        Self {
            wkid: Some(wkid),
            ..Self::default()
        }
    }
}

/// A 2-D coordinate as `[x, y]`.
pub type Coordinate = [f64; 2];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
}

impl Point {
    pub fn new(x: f64, y: f64, spatial_reference: Option<SpatialReference>) -> Self {
        Self {
            x,
            y,
            spatial_reference,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        [self.x, self.y]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polyline {
    pub paths: Vec<Vec<Coordinate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
}

impl Polyline {
    /// Builds a 2-D polyline owning a copy of the spatial reference.
    pub fn new(paths: Vec<Vec<Coordinate>>, spatial_reference: &SpatialReference) -> Self {
        Self {
            paths,
            spatial_reference: Some(spatial_reference.clone()),
        }
    }

    pub fn first_coordinate(&self) -> Option<Coordinate> {
        self.paths.first().and_then(|path| path.first()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.iter().all(|path| path.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polygon {
    pub rings: Vec<Vec<Coordinate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
}

/// Any geometry a feature or engine call can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Geometry {
    Point(Point),
    Polyline(Polyline),
    Polygon(Polygon),
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "point",
            Geometry::Polyline(_) => "polyline",
            Geometry::Polygon(_) => "polygon",
        }
    }

    pub fn as_polyline(&self) -> Option<&Polyline> {
        match self {
            Geometry::Polyline(line) => Some(line),
            _ => None,
        }
    }

    pub fn into_polyline(self) -> Option<Polyline> {
        match self {
            Geometry::Polyline(line) => Some(line),
            _ => None,
        }
    }

    /// True for geometries with no vertices at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(p) => p.x.is_nan() || p.y.is_nan(),
            Geometry::Polyline(line) => line.is_empty(),
            Geometry::Polygon(poly) => poly.rings.iter().all(|ring| ring.is_empty()),
        }
    }
}

impl From<Point> for Geometry {
    fn from(point: Point) -> Self {
        Geometry::Point(point)
    }
}

impl From<Polyline> for Geometry {
    fn from(line: Polyline) -> Self {
        Geometry::Polyline(line)
    }
}

impl From<Polygon> for Geometry {
    fn from(polygon: Polygon) -> Self {
        Geometry::Polygon(polygon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinearUnit {
    #[default]
    Feet,
    Meters,
    Kilometers,
    Miles,
}

impl LinearUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinearUnit::Feet => "feet",
            LinearUnit::Meters => "meters",
            LinearUnit::Kilometers => "kilometers",
            LinearUnit::Miles => "miles",
        }
    }
}

/// Result of a nearest-coordinate query. `coordinate` is absent when the
/// engine could not snap, e.g. for an empty line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestPointResult {
    pub coordinate: Option<Point>,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub is_empty: bool,
}
