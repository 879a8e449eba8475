// Construction of the map, its layers and the selection control
use crate::config::ViewConfiguration;
use crate::engine::{
    ControlHandle, ControlKind, LayerHandle, MapEngine, MapHandle, MapOptions, ProtocolHandle,
    ProtocolSpec, ResponseFormat, StrategyHandle, StrategySpec, TileLayerOptions, TileSource,
    TransitionEffect, VectorLayerOptions,
};
use crate::error::Result;
use crate::projection::Projection;
use crate::style::poi_style_map;

pub const POI_LAYER_NAME: &str = "POIs";
pub const CLUSTER_DISTANCE: u32 = 50;
pub const CLUSTER_THRESHOLD: u32 = 2;

/// The point-of-interest layer together with the objects `refresh` needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoiLayer {
    pub layer: LayerHandle,
    pub protocol: ProtocolHandle,
    pub bbox_strategy: StrategyHandle,
    pub cluster_strategy: StrategyHandle,
    pub refresh_strategy: StrategyHandle,
}

pub fn map_options(config: &ViewConfiguration) -> MapOptions {
    MapOptions {
        projection: Projection::Geographic,
        controls: vec![ControlKind::Navigation, ControlKind::PanZoomBar, ControlKind::Attribution],
        max_extent: config.bounds,
        num_zoom_levels: config.zoom_levels,
        units: config.units.clone(),
        max_resolution: config.max_resolution,
        theme: None,
    }
}

pub fn create_map<E: MapEngine + ?Sized>(
    engine: &mut E,
    element_id: &str,
    config: &ViewConfiguration,
) -> Result<MapHandle> {
    engine.create_map(element_id, &map_options(config))
}

pub fn create_base_layer<E: MapEngine + ?Sized>(engine: &mut E) -> Result<LayerHandle> {
    engine.create_tile_layer(&TileLayerOptions {
        source: TileSource::OpenStreetMap,
        transition_effect: Some(TransitionEffect::Resize),
    })
}

pub fn create_poi_layer<E: MapEngine + ?Sized>(
    engine: &mut E,
    config: &ViewConfiguration,
) -> Result<PoiLayer> {
    let bbox_strategy = engine.create_strategy(&StrategySpec::BoundingBox)?;
    let cluster_strategy = engine.create_strategy(&StrategySpec::Cluster {
        distance: CLUSTER_DISTANCE,
        threshold: CLUSTER_THRESHOLD,
    })?;
    let refresh_strategy = engine.create_strategy(&StrategySpec::Refresh {
        force: true,
        active: true,
    })?;

    let protocol = engine.create_http_protocol(&ProtocolSpec {
        url: config.api_url.clone(),
        params: config.filter.clone(),
        format: ResponseFormat::Text,
    })?;

    // Strategy order matters: load by bbox, then cluster, then refresh
    let layer = engine.create_vector_layer(
        POI_LAYER_NAME,
        &VectorLayerOptions {
            strategies: vec![bbox_strategy, cluster_strategy, refresh_strategy],
            protocol,
            style_map: poi_style_map(),
        },
    )?;

    Ok(PoiLayer {
        layer,
        protocol,
        bbox_strategy,
        cluster_strategy,
        refresh_strategy,
    })
}

pub fn create_select_control<E: MapEngine + ?Sized>(
    engine: &mut E,
    layer: LayerHandle,
) -> Result<ControlHandle> {
    engine.create_select_control(layer)
}
