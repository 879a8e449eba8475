// This is the models module containing shared data structures
use geo_types::{coord, Coord, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half the circumference of the spherical-Mercator world, in meters.
pub const WORLD_EXTENT: f64 = 20037508.34;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        LonLat { lon, lat }
    }
}

impl From<Coord<f64>> for LonLat {
    fn from(c: Coord<f64>) -> Self {
        LonLat { lon: c.x, lat: c.y }
    }
}

impl From<LonLat> for Coord<f64> {
    fn from(p: LonLat) -> Self {
        coord! { x: p.lon, y: p.lat }
    }
}

/// Axis-aligned extent in the order the mapping engine expects.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Bounds {
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Bounds { left, bottom, right, top }
    }

    /// The full spherical-Mercator world.
    pub fn world() -> Self {
        Bounds::new(-WORLD_EXTENT, -WORLD_EXTENT, WORLD_EXTENT, WORLD_EXTENT)
    }

    pub fn center(&self) -> LonLat {
        let rect = Rect::new(
            coord! { x: self.left, y: self.bottom },
            coord! { x: self.right, y: self.top },
        );
        rect.center().into()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Size { w, h }
    }
}

/// Identifier the engine assigns to a feature.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct FeatureId(pub String);

impl From<&str> for FeatureId {
    fn from(s: &str) -> Self {
        FeatureId(s.to_string())
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FeatureAttributes {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub count: Option<f64>,
}

/// A feature as reported by the POI layer. Cluster features carry their
/// members in `cluster`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub id: FeatureId,
    #[serde(default)]
    pub attributes: FeatureAttributes,
    // Bounds of the feature geometry, used to anchor its popup
    #[serde(default)]
    pub bounds: Option<Bounds>,
    #[serde(default)]
    pub cluster: Option<Vec<FeatureRecord>>,
}

impl FeatureRecord {
    pub fn title(&self) -> &str {
        self.attributes.title.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.attributes.description.as_deref().unwrap_or("")
    }

    pub fn anchor(&self) -> Option<LonLat> {
        self.bounds.as_ref().map(Bounds::center)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureEventKind {
    #[serde(rename = "featureselected")]
    Selected,
    #[serde(rename = "featureunselected")]
    Unselected,
}

impl FeatureEventKind {
    pub fn event_name(&self) -> &'static str {
        match self {
            FeatureEventKind::Selected => "featureselected",
            FeatureEventKind::Unselected => "featureunselected",
        }
    }
}

/// Payload forwarded by the host for a layer selection event.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeatureEvent {
    #[serde(rename = "type")]
    pub kind: FeatureEventKind,
    pub feature: FeatureRecord,
}

// Bookkeeping for one attached map view
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ViewRecord {
    pub element_id: String,
    pub attached_at: f64, // Host timestamp in ms
    pub refreshes: usize,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ViewStats {
    pub attached_views: usize,
    pub total_attached: usize,
    pub total_refreshes: usize,
    pub views: Vec<ViewRecord>,
}
