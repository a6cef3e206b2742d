use serde::{Deserialize, Serialize, Serializer};

use super::{Coordinate, Geometry, Shape, SpatialReference};

/// Esri JSON wire form of a single-part geometry, as accepted by `applyEdits` and as
/// returned by `query`.
///
/// Only two-dimensional vertices are modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EsriGeometry {
    Point {
        x: f64,
        y: f64,
        #[serde(
            rename = "spatialReference",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        spatial_reference: Option<SpatialReference>,
    },
    Polyline {
        paths: Vec<Vec<[f64; 2]>>,
        #[serde(
            rename = "spatialReference",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        spatial_reference: Option<SpatialReference>,
    },
    Polygon {
        rings: Vec<Vec<[f64; 2]>>,
        #[serde(
            rename = "spatialReference",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        spatial_reference: Option<SpatialReference>,
    },
}

impl EsriGeometry {
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn to_coordinate(&self) -> Option<Coordinate> {
        match self {
            EsriGeometry::Point { x, y, .. } => Some(Coordinate::new(*y, *x)),
            _ => None,
        }
    }
}

fn to_vertices(line: &geo::LineString) -> Vec<[f64; 2]> {
    line.coords().map(|coord| [coord.x, coord.y]).collect()
}

impl From<&Geometry> for EsriGeometry {
    fn from(geometry: &Geometry) -> Self {
        let spatial_reference = Some(geometry.spatial_reference);
        match &geometry.shape {
            Shape::Point(point) => EsriGeometry::Point {
                x: point.x(),
                y: point.y(),
                spatial_reference,
            },
            Shape::Polyline(path) => EsriGeometry::Polyline {
                paths: vec![to_vertices(path)],
                spatial_reference,
            },
            Shape::Polygon(ring) => EsriGeometry::Polygon {
                rings: vec![to_vertices(ring)],
                spatial_reference,
            },
        }
    }
}

impl Serialize for Geometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EsriGeometry::from(self).serialize(serializer)
    }
}
