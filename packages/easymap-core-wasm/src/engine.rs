// Capability traits for the two external collaborators: the mapping
// engine that owns maps, layers, controls and popups, and the view
// framework that binds the controller to its container element.
//
// Engine objects never cross into Rust. The engine hands back opaque
// handles and the controller refers to objects only through them.

use serde::{Deserialize, Serialize};

use crate::config::FilterParams;
use crate::error::Result;
use crate::models::{Bounds, FeatureEventKind, FeatureId, LonLat, Size};
use crate::projection::Projection;
use crate::style::StyleMap;

macro_rules! engine_handle {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
            #[serde(transparent)]
            pub struct $name(pub u32);
        )*
    };
}

engine_handle!(
    /// A map instance bound to a container element.
    MapHandle,
    LayerHandle,
    ControlHandle,
    StrategyHandle,
    ProtocolHandle,
    PopupHandle,
);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Navigation,
    PanZoomBar,
    Attribution,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    pub projection: Projection,
    pub controls: Vec<ControlKind>,
    pub max_extent: Bounds,
    pub num_zoom_levels: u32,
    pub units: String,
    pub max_resolution: f64,
    // Serialized as null so the engine skips loading its default theme
    pub theme: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileSource {
    #[serde(rename = "OSM")]
    OpenStreetMap,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransitionEffect {
    Resize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TileLayerOptions {
    pub source: TileSource,
    pub transition_effect: Option<TransitionEffect>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum StrategySpec {
    /// Loads the features inside the current viewport.
    #[serde(rename = "BBOX")]
    BoundingBox,
    Cluster { distance: u32, threshold: u32 },
    Refresh { force: bool, active: bool },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProtocolSpec {
    pub url: String,
    pub params: FilterParams,
    pub format: ResponseFormat,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VectorLayerOptions {
    pub strategies: Vec<StrategyHandle>,
    pub protocol: ProtocolHandle,
    pub style_map: StyleMap,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PopupSpec {
    pub id: String,
    pub anchor: LonLat,
    pub size: Size,
    pub max_size: Size,
    pub content_html: String,
    pub close_box: bool,
    pub pan_map_if_out_of_view: bool,
}

/// The mapping library: constructs and composes map objects.
pub trait MapEngine {
    fn create_map(&mut self, element_id: &str, options: &MapOptions) -> Result<MapHandle>;

    fn create_tile_layer(&mut self, options: &TileLayerOptions) -> Result<LayerHandle>;

    fn create_strategy(&mut self, spec: &StrategySpec) -> Result<StrategyHandle>;

    fn create_http_protocol(&mut self, spec: &ProtocolSpec) -> Result<ProtocolHandle>;

    fn create_vector_layer(&mut self, name: &str, options: &VectorLayerOptions) -> Result<LayerHandle>;

    fn add_layer(&mut self, map: MapHandle, layer: LayerHandle) -> Result<()>;

    /// Single click-select control bound to one layer.
    fn create_select_control(&mut self, layer: LayerHandle) -> Result<ControlHandle>;

    fn add_control(&mut self, map: MapHandle, control: ControlHandle) -> Result<()>;

    fn activate_control(&mut self, control: ControlHandle) -> Result<()>;

    fn transform(&mut self, point: LonLat, from: Projection, to: Projection) -> Result<LonLat>;

    fn set_center(&mut self, map: MapHandle, center: LonLat, zoom: u32) -> Result<()>;

    fn create_popup(&mut self, spec: &PopupSpec) -> Result<PopupHandle>;

    /// With `exclusive` set, every other popup on the map is closed first.
    fn add_popup(&mut self, map: MapHandle, popup: PopupHandle, exclusive: bool) -> Result<()>;

    fn remove_popup(&mut self, map: MapHandle, popup: PopupHandle) -> Result<()>;

    fn destroy_popup(&mut self, popup: PopupHandle) -> Result<()>;

    /// The layer a feature currently belongs to, if it is still attached.
    fn feature_layer(&mut self, feature: &FeatureId) -> Result<Option<LayerHandle>>;

    fn unselect(&mut self, control: ControlHandle, feature: &FeatureId) -> Result<()>;

    fn set_protocol_param(&mut self, protocol: ProtocolHandle, key: &str, value: &str) -> Result<()>;

    /// Forces the strategy to reload its layer.
    fn refresh_strategy(&mut self, strategy: StrategyHandle) -> Result<()>;
}

/// The view framework: element identity, data attributes and event
/// forwarding for the container the controller is bound to.
pub trait ViewBinding {
    fn element_id(&self) -> &str;

    /// Value of the `data-<key>` attribute, `None` when unset.
    fn data(&self, key: &str) -> Option<String>;

    fn subscribe(&mut self, layer: LayerHandle, events: &[FeatureEventKind]) -> Result<()>;
}
