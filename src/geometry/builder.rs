use super::{Coordinate, Geometry, GeometryInput, Shape, SpatialReference};

/// Build the geometry described by already validated input.
///
/// Input order is preserved position for position and every coordinate is mapped from
/// (latitude, longitude) to (x = longitude, y = latitude). Polygon rings are closed with
/// `close_ring`.
pub fn build_geometry(input: &GeometryInput, spatial_reference: SpatialReference) -> Geometry {
    match input {
        GeometryInput::Point(coordinate) => build_point(*coordinate, spatial_reference),
        GeometryInput::Polyline(coordinates) => build_polyline(coordinates, spatial_reference),
        GeometryInput::Polygon(coordinates) => build_polygon(coordinates, spatial_reference),
    }
}

pub fn build_point(coordinate: Coordinate, spatial_reference: SpatialReference) -> Geometry {
    Geometry {
        shape: Shape::Point(geo::Point::from(geo::Coord::from(coordinate))),
        spatial_reference,
    }
}

pub fn build_polyline(coordinates: &[Coordinate], spatial_reference: SpatialReference) -> Geometry {
    Geometry {
        shape: Shape::Polyline(to_line_string(coordinates)),
        spatial_reference,
    }
}

pub fn build_polygon(coordinates: &[Coordinate], spatial_reference: SpatialReference) -> Geometry {
    let mut ring = to_line_string(coordinates);
    close_ring(&mut ring);
    Geometry {
        shape: Shape::Polygon(ring),
        spatial_reference,
    }
}

/// Append a copy of the first vertex when the last vertex differs from it.
///
/// Both ordinates are compared with exact floating point equality, so a ring that is open
/// by any epsilon gets an extra near-duplicate vertex. Closed and empty rings are left
/// untouched.
pub fn close_ring(ring: &mut geo::LineString) {
    let (first, last) = match (ring.0.first(), ring.0.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return,
    };
    if first.x != last.x || first.y != last.y {
        ring.0.push(first);
    }
}

fn to_line_string(coordinates: &[Coordinate]) -> geo::LineString {
    coordinates
        .iter()
        .map(|coordinate| geo::Coord::from(*coordinate))
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::geometry::{Coordinate, GeometryInput, GeometryKind, Shape, SpatialReference};

    use super::{build_geometry, build_point, build_polygon, build_polyline, close_ring};

    fn coords(pairs: &[(f64, f64)]) -> Vec<Coordinate> {
        pairs
            .iter()
            .map(|(lat, lon)| Coordinate::new(*lat, *lon))
            .collect()
    }

    fn ring_of(coordinates: &[Coordinate]) -> geo::LineString {
        match build_polygon(coordinates, SpatialReference::default()).shape {
            Shape::Polygon(ring) => ring,
            other => panic!("Expected a polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_build_point_swaps_to_x_y() {
        let geometry = build_point(Coordinate::new(10.0, 20.0), SpatialReference::new(3857));
        assert_eq!(Shape::Point(geo::Point::new(20.0, 10.0)), geometry.shape);
        assert_eq!(3857, geometry.spatial_reference.wkid);
    }

    #[test]
    fn test_build_polyline_preserves_order() {
        let input = coords(&[(1.0, 2.0), (3.0, 4.0), (3.0, 4.0), (-5.0, 6.5)]);
        let geometry = build_polyline(&input, SpatialReference::default());
        let expected: geo::LineString =
            vec![(2.0, 1.0), (4.0, 3.0), (4.0, 3.0), (6.5, -5.0)].into();
        assert_eq!(Shape::Polyline(expected), geometry.shape);
        assert_eq!(4326, geometry.spatial_reference.wkid);
    }

    #[rstest]
    #[case(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)], 4)]
    #[case(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.0, 0.0)], 4)]
    #[case(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)], 5)]
    // Open by a floating point epsilon, so it still gets closed.
    #[case(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.0, 1e-12)], 5)]
    fn test_polygon_ring_is_closed(#[case] pairs: &[(f64, f64)], #[case] expected_len: usize) {
        let input = coords(pairs);
        let ring = ring_of(&input);
        assert_eq!(expected_len, ring.0.len());
        assert!(ring.is_closed());
        for (position, coordinate) in input.iter().enumerate() {
            assert_eq!(geo::Coord::from(*coordinate), ring.0[position]);
        }
    }

    #[test]
    fn test_close_ring_compares_both_ordinates() {
        // Same x, different y.
        let mut ring: geo::LineString = vec![(1.0, 1.0), (2.0, 2.0), (1.0, 3.0)].into();
        close_ring(&mut ring);
        assert_eq!(4, ring.0.len());
        assert_eq!(geo::Coord { x: 1.0, y: 1.0 }, ring.0[3]);
    }

    #[test]
    fn test_close_ring_is_idempotent() {
        let mut ring: geo::LineString = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)].into();
        close_ring(&mut ring);
        let once = ring.clone();
        close_ring(&mut ring);
        assert_eq!(once, ring);
    }

    #[test]
    fn test_close_ring_ignores_empty() {
        let mut ring = geo::LineString::new(vec![]);
        close_ring(&mut ring);
        assert!(ring.0.is_empty());
    }

    #[rstest]
    #[case(GeometryInput::Point(Coordinate::new(1.0, 2.0)), GeometryKind::Point)]
    #[case(GeometryInput::Polyline(coords(&[(1.0, 2.0), (3.0, 4.0)])), GeometryKind::Polyline)]
    #[case(
        GeometryInput::Polygon(coords(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)])),
        GeometryKind::Polygon
    )]
    fn test_build_geometry_kind(#[case] input: GeometryInput, #[case] expected: GeometryKind) {
        let geometry = build_geometry(&input, SpatialReference::new(4326));
        assert_eq!(expected, geometry.kind());
    }
}
