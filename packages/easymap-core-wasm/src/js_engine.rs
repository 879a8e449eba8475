// MapEngine backed by the page's mapping library. The `easyMapHelpers`
// namespace owns the library objects and hands out integer handles.
use js_sys::{Function, Reflect};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::engine::*;
use crate::error::{MapViewError, Result};
use crate::models::{FeatureId, LonLat};
use crate::projection::Projection;
use crate::style;

mod js {
    use js_sys::Function;
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = createMap, catch)]
        pub fn create_map(element_id: &str, options: JsValue) -> Result<u32, JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = createTileLayer, catch)]
        pub fn create_tile_layer(options: JsValue) -> Result<u32, JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = createStrategy, catch)]
        pub fn create_strategy(spec: JsValue) -> Result<u32, JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = createHttpProtocol, catch)]
        pub fn create_http_protocol(spec: JsValue) -> Result<u32, JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = createVectorLayer, catch)]
        pub fn create_vector_layer(
            name: &str,
            options: JsValue,
            radius: &Function,
            count: &Function,
        ) -> Result<u32, JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = addLayer, catch)]
        pub fn add_layer(map: u32, layer: u32) -> Result<(), JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = createSelectControl, catch)]
        pub fn create_select_control(layer: u32) -> Result<u32, JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = addControl, catch)]
        pub fn add_control(map: u32, control: u32) -> Result<(), JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = activateControl, catch)]
        pub fn activate_control(control: u32) -> Result<(), JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, catch)]
        pub fn transform(lon: f64, lat: f64, from: &str, to: &str) -> Result<JsValue, JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = setCenter, catch)]
        pub fn set_center(map: u32, lon: f64, lat: f64, zoom: u32) -> Result<(), JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = createPopup, catch)]
        pub fn create_popup(spec: JsValue, on_close: &Function) -> Result<u32, JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = addPopup, catch)]
        pub fn add_popup(map: u32, popup: u32, exclusive: bool) -> Result<(), JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = removePopup, catch)]
        pub fn remove_popup(map: u32, popup: u32) -> Result<(), JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = destroyPopup, catch)]
        pub fn destroy_popup(popup: u32) -> Result<(), JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = featureLayer, catch)]
        pub fn feature_layer(feature_id: &str) -> Result<Option<u32>, JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = unselectFeature, catch)]
        pub fn unselect_feature(control: u32, feature_id: &str) -> Result<(), JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = setProtocolParam, catch)]
        pub fn set_protocol_param(protocol: u32, key: &str, value: &str) -> Result<(), JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = refreshStrategy, catch)]
        pub fn refresh_strategy(strategy: u32) -> Result<(), JsValue>;

        #[wasm_bindgen(js_namespace = easyMapHelpers, js_name = subscribeFeatureEvents, catch)]
        pub fn subscribe_feature_events(
            layer: u32,
            events: JsValue,
            callback: &Function,
        ) -> Result<(), JsValue>;
    }
}

pub(crate) use js::subscribe_feature_events;

/// Serializes option records for the engine. Unset options become `null`
/// rather than `undefined` so the library does not apply its defaults.
pub(crate) fn to_js<T: Serialize + ?Sized>(call: &'static str, value: &T) -> Result<JsValue> {
    let serializer = Serializer::new().serialize_missing_as_null(true);
    value.serialize(&serializer).map_err(|e| MapViewError::Engine {
        call,
        message: e.to_string(),
    })
}

// Reads `feature.attributes.count` from a library feature object
fn feature_count(feature: &JsValue) -> Option<f64> {
    let attributes = Reflect::get(feature, &JsValue::from_str("attributes")).ok()?;
    Reflect::get(&attributes, &JsValue::from_str("count")).ok()?.as_f64()
}

pub struct JsMapEngine {
    on_popup_close: Function,
    // Style context callbacks must outlive the layers that use them
    radius_contexts: Vec<Closure<dyn Fn(JsValue) -> f64>>,
    count_contexts: Vec<Closure<dyn Fn(JsValue) -> String>>,
}

impl JsMapEngine {
    /// `on_popup_close` is called by the library with the popup handle
    /// whenever a popup's close box is clicked.
    pub fn new(on_popup_close: Function) -> Self {
        JsMapEngine {
            on_popup_close,
            radius_contexts: Vec::new(),
            count_contexts: Vec::new(),
        }
    }
}

impl MapEngine for JsMapEngine {
    fn create_map(&mut self, element_id: &str, options: &MapOptions) -> Result<MapHandle> {
        js::create_map(element_id, to_js("createMap", options)?)
            .map(MapHandle)
            .map_err(|e| MapViewError::engine("createMap", e))
    }

    fn create_tile_layer(&mut self, options: &TileLayerOptions) -> Result<LayerHandle> {
        js::create_tile_layer(to_js("createTileLayer", options)?)
            .map(LayerHandle)
            .map_err(|e| MapViewError::engine("createTileLayer", e))
    }

    fn create_strategy(&mut self, spec: &StrategySpec) -> Result<StrategyHandle> {
        js::create_strategy(to_js("createStrategy", spec)?)
            .map(StrategyHandle)
            .map_err(|e| MapViewError::engine("createStrategy", e))
    }

    fn create_http_protocol(&mut self, spec: &ProtocolSpec) -> Result<ProtocolHandle> {
        js::create_http_protocol(to_js("createHttpProtocol", spec)?)
            .map(ProtocolHandle)
            .map_err(|e| MapViewError::engine("createHttpProtocol", e))
    }

    fn create_vector_layer(&mut self, name: &str, options: &VectorLayerOptions) -> Result<LayerHandle> {
        let radius = Closure::wrap(Box::new(|feature: JsValue| {
            style::point_radius(feature_count(&feature))
        }) as Box<dyn Fn(JsValue) -> f64>);
        let count = Closure::wrap(Box::new(|feature: JsValue| {
            style::count_label(feature_count(&feature))
        }) as Box<dyn Fn(JsValue) -> String>);

        let layer = js::create_vector_layer(
            name,
            to_js("createVectorLayer", options)?,
            radius.as_ref().unchecked_ref(),
            count.as_ref().unchecked_ref(),
        )
        .map(LayerHandle)
        .map_err(|e| MapViewError::engine("createVectorLayer", e))?;

        self.radius_contexts.push(radius);
        self.count_contexts.push(count);
        Ok(layer)
    }

    fn add_layer(&mut self, map: MapHandle, layer: LayerHandle) -> Result<()> {
        js::add_layer(map.0, layer.0).map_err(|e| MapViewError::engine("addLayer", e))
    }

    fn create_select_control(&mut self, layer: LayerHandle) -> Result<ControlHandle> {
        js::create_select_control(layer.0)
            .map(ControlHandle)
            .map_err(|e| MapViewError::engine("createSelectControl", e))
    }

    fn add_control(&mut self, map: MapHandle, control: ControlHandle) -> Result<()> {
        js::add_control(map.0, control.0).map_err(|e| MapViewError::engine("addControl", e))
    }

    fn activate_control(&mut self, control: ControlHandle) -> Result<()> {
        js::activate_control(control.0).map_err(|e| MapViewError::engine("activateControl", e))
    }

    fn transform(&mut self, point: LonLat, from: Projection, to: Projection) -> Result<LonLat> {
        let value = js::transform(point.lon, point.lat, from.code(), to.code())
            .map_err(|e| MapViewError::engine("transform", e))?;
        serde_wasm_bindgen::from_value(value).map_err(|e| MapViewError::Engine {
            call: "transform",
            message: e.to_string(),
        })
    }

    fn set_center(&mut self, map: MapHandle, center: LonLat, zoom: u32) -> Result<()> {
        js::set_center(map.0, center.lon, center.lat, zoom)
            .map_err(|e| MapViewError::engine("setCenter", e))
    }

    fn create_popup(&mut self, spec: &PopupSpec) -> Result<PopupHandle> {
        js::create_popup(to_js("createPopup", spec)?, &self.on_popup_close)
            .map(PopupHandle)
            .map_err(|e| MapViewError::engine("createPopup", e))
    }

    fn add_popup(&mut self, map: MapHandle, popup: PopupHandle, exclusive: bool) -> Result<()> {
        js::add_popup(map.0, popup.0, exclusive).map_err(|e| MapViewError::engine("addPopup", e))
    }

    fn remove_popup(&mut self, map: MapHandle, popup: PopupHandle) -> Result<()> {
        js::remove_popup(map.0, popup.0).map_err(|e| MapViewError::engine("removePopup", e))
    }

    fn destroy_popup(&mut self, popup: PopupHandle) -> Result<()> {
        js::destroy_popup(popup.0).map_err(|e| MapViewError::engine("destroyPopup", e))
    }

    fn feature_layer(&mut self, feature: &FeatureId) -> Result<Option<LayerHandle>> {
        js::feature_layer(&feature.0)
            .map(|layer| layer.map(LayerHandle))
            .map_err(|e| MapViewError::engine("featureLayer", e))
    }

    fn unselect(&mut self, control: ControlHandle, feature: &FeatureId) -> Result<()> {
        js::unselect_feature(control.0, &feature.0)
            .map_err(|e| MapViewError::engine("unselectFeature", e))
    }

    fn set_protocol_param(&mut self, protocol: ProtocolHandle, key: &str, value: &str) -> Result<()> {
        js::set_protocol_param(protocol.0, key, value)
            .map_err(|e| MapViewError::engine("setProtocolParam", e))
    }

    fn refresh_strategy(&mut self, strategy: StrategyHandle) -> Result<()> {
        js::refresh_strategy(strategy.0).map_err(|e| MapViewError::engine("refreshStrategy", e))
    }
}
