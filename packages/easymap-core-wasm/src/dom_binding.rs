use js_sys::Function;
use web_sys::Element;

use crate::engine::{LayerHandle, ViewBinding};
use crate::error::{MapViewError, Result};
use crate::js_engine::{subscribe_feature_events, to_js};
use crate::models::FeatureEventKind;

/// Binds a controller to its container element. Configuration comes from
/// the element's `data-*` attributes; layer events are forwarded to
/// `on_feature_event` as `{ type, feature }` records.
pub struct DomBinding {
    element: Element,
    element_id: String,
    on_feature_event: Function,
}

impl DomBinding {
    pub fn new(element: Element, on_feature_event: Function) -> Self {
        let element_id = element.id();
        DomBinding {
            element,
            element_id,
            on_feature_event,
        }
    }
}

impl ViewBinding for DomBinding {
    fn element_id(&self) -> &str {
        &self.element_id
    }

    fn data(&self, key: &str) -> Option<String> {
        self.element.get_attribute(&format!("data-{}", key))
    }

    fn subscribe(&mut self, layer: LayerHandle, events: &[FeatureEventKind]) -> Result<()> {
        let names: Vec<&str> = events.iter().map(FeatureEventKind::event_name).collect();
        subscribe_feature_events(layer.0, to_js("subscribeFeatureEvents", &names)?, &self.on_feature_event)
            .map_err(|e| MapViewError::engine("subscribeFeatureEvents", e))
    }
}
