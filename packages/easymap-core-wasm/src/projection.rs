// Coordinate reference systems the map view works with, and a native
// implementation of the geographic <-> spherical Mercator conversion.
use geo_types::{coord, Coord};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use crate::models::{LonLat, WORLD_EXTENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Projection {
    /// WGS84 longitude/latitude in degrees
    #[serde(rename = "EPSG:4326")]
    Geographic,
    /// Spherical Mercator in meters
    #[serde(rename = "EPSG:900913")]
    SphericalMercator,
}

impl Projection {
    pub fn code(&self) -> &'static str {
        match self {
            Projection::Geographic => "EPSG:4326",
            Projection::SphericalMercator => "EPSG:900913",
        }
    }

    /// 3857 and 900913 name the same projection.
    pub fn from_epsg(code: u32) -> Option<Self> {
        match code {
            4326 => Some(Projection::Geographic),
            3857 | 900913 => Some(Projection::SphericalMercator),
            _ => None,
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

pub fn geographic_to_mercator(c: Coord<f64>) -> Coord<f64> {
    let x = c.x * WORLD_EXTENT / 180.0;
    let y = ((90.0 + c.y) * PI / 360.0).tan().ln() / (PI / 180.0);
    coord! { x: x, y: y * WORLD_EXTENT / 180.0 }
}

pub fn mercator_to_geographic(c: Coord<f64>) -> Coord<f64> {
    let lon = c.x / WORLD_EXTENT * 180.0;
    let lat = c.y / WORLD_EXTENT * 180.0;
    let lat = 180.0 / PI * (2.0 * (lat * PI / 180.0).exp().atan() - PI / 2.0);
    coord! { x: lon, y: lat }
}

pub fn transform(point: LonLat, from: Projection, to: Projection) -> LonLat {
    match (from, to) {
        (Projection::Geographic, Projection::SphericalMercator) => {
            geographic_to_mercator(point.into()).into()
        }
        (Projection::SphericalMercator, Projection::Geographic) => {
            mercator_to_geographic(point.into()).into()
        }
        _ => point,
    }
}
