pub mod builder;
pub mod coordinate;
pub mod esri;

pub use coordinate::{Coordinate, SpatialReference};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    Polyline,
    Polygon,
}

impl GeometryKind {
    pub fn min_vertices(&self) -> usize {
        match self {
            GeometryKind::Point => 1,
            GeometryKind::Polyline => 2,
            GeometryKind::Polygon => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeometryInput {
    Point(Coordinate),
    Polyline(Vec<Coordinate>),
    Polygon(Vec<Coordinate>),
}

/// Shape of a built geometry in x/y (longitude/latitude) order.
///
/// A polygon holds exactly one ring, and that ring is always closed.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(geo::Point),
    Polyline(geo::LineString),
    Polygon(geo::LineString),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub shape: Shape,
    pub spatial_reference: SpatialReference,
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self.shape {
            Shape::Point(_) => GeometryKind::Point,
            Shape::Polyline(_) => GeometryKind::Polyline,
            Shape::Polygon(_) => GeometryKind::Polygon,
        }
    }
}
