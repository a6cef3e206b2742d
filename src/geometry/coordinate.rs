use serde::{Deserialize, Serialize};

pub const WGS84_WKID: u32 = 4326;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Coordinate> for geo::Coord {
    fn from(value: Coordinate) -> Self {
        geo::Coord {
            x: value.longitude,
            y: value.latitude,
        }
    }
}

impl From<geo::Coord> for Coordinate {
    fn from(value: geo::Coord) -> Self {
        Self {
            latitude: value.y,
            longitude: value.x,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialReference {
    pub wkid: u32,
}

impl SpatialReference {
    pub fn new(wkid: u32) -> Self {
        Self { wkid }
    }
}

impl Default for SpatialReference {
    fn default() -> Self {
        Self { wkid: WGS84_WKID }
    }
}
