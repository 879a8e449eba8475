// In-memory engine and binding used by the unit tests
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::config::{ATTR_API_URL, ATTR_INITIAL_LAT, ATTR_INITIAL_LON, ATTR_INITIAL_ZOOM};
use crate::engine::*;
use crate::error::{MapViewError, Result};
use crate::models::{Bounds, FeatureAttributes, FeatureEventKind, FeatureId, FeatureRecord, LonLat};
use crate::projection::{self, Projection};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    CreateMap(String, MapOptions, MapHandle),
    CreateTileLayer(TileLayerOptions, LayerHandle),
    CreateStrategy(StrategySpec, StrategyHandle),
    CreateProtocol(ProtocolHandle),
    CreateVectorLayer(LayerHandle),
    AddLayer(MapHandle, LayerHandle),
    CreateSelectControl(LayerHandle, ControlHandle),
    AddControl(MapHandle, ControlHandle),
    ActivateControl(ControlHandle),
    Transform(LonLat, Projection, Projection),
    SetCenter(MapHandle, LonLat, u32),
    CreatePopup(PopupHandle),
    AddPopup(MapHandle, PopupHandle, bool),
    RemovePopup(MapHandle, PopupHandle),
    DestroyPopup(PopupHandle),
    Unselect(ControlHandle, FeatureId),
    SetProtocolParam(ProtocolHandle, String, String),
    RefreshStrategy(StrategyHandle),
}

#[derive(Debug, Clone)]
pub struct FakeProtocol {
    pub url: String,
    pub params: BTreeMap<String, String>,
}

/// Records every call and keeps just enough state to answer queries.
#[derive(Debug, Default)]
pub struct FakeEngine {
    next_handle: u32,
    pub calls: Vec<EngineCall>,
    pub strategies: HashMap<StrategyHandle, StrategySpec>,
    pub protocols: HashMap<ProtocolHandle, FakeProtocol>,
    pub vector_layers: HashMap<LayerHandle, (String, VectorLayerOptions)>,
    pub popups: HashMap<PopupHandle, PopupSpec>,
    pub popups_on_map: Vec<PopupHandle>,
    pub attached_features: HashMap<FeatureId, LayerHandle>,
    // Engine call name that should fail, for error propagation tests
    pub fail_on: Option<&'static str>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    fn check(&self, call: &'static str) -> Result<()> {
        match self.fail_on {
            Some(name) if name == call => Err(MapViewError::Engine {
                call,
                message: "injected failure".to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub fn count(&self, pred: impl Fn(&EngineCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn attach_feature(&mut self, feature: &str, layer: LayerHandle) {
        self.attached_features.insert(FeatureId::from(feature), layer);
    }

    pub fn detach_feature(&mut self, feature: &str) {
        self.attached_features.remove(&FeatureId::from(feature));
    }
}

impl MapEngine for FakeEngine {
    fn create_map(&mut self, element_id: &str, options: &MapOptions) -> Result<MapHandle> {
        self.check("create_map")?;
        let map = MapHandle(self.handle());
        self.calls.push(EngineCall::CreateMap(element_id.to_string(), options.clone(), map));
        Ok(map)
    }

    fn create_tile_layer(&mut self, options: &TileLayerOptions) -> Result<LayerHandle> {
        self.check("create_tile_layer")?;
        let layer = LayerHandle(self.handle());
        self.calls.push(EngineCall::CreateTileLayer(options.clone(), layer));
        Ok(layer)
    }

    fn create_strategy(&mut self, spec: &StrategySpec) -> Result<StrategyHandle> {
        self.check("create_strategy")?;
        let strategy = StrategyHandle(self.handle());
        self.strategies.insert(strategy, spec.clone());
        self.calls.push(EngineCall::CreateStrategy(spec.clone(), strategy));
        Ok(strategy)
    }

    fn create_http_protocol(&mut self, spec: &ProtocolSpec) -> Result<ProtocolHandle> {
        self.check("create_http_protocol")?;
        let protocol = ProtocolHandle(self.handle());
        let params = spec
            .params
            .query_pairs()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.protocols.insert(protocol, FakeProtocol { url: spec.url.clone(), params });
        self.calls.push(EngineCall::CreateProtocol(protocol));
        Ok(protocol)
    }

    fn create_vector_layer(&mut self, name: &str, options: &VectorLayerOptions) -> Result<LayerHandle> {
        self.check("create_vector_layer")?;
        let layer = LayerHandle(self.handle());
        self.vector_layers.insert(layer, (name.to_string(), options.clone()));
        self.calls.push(EngineCall::CreateVectorLayer(layer));
        Ok(layer)
    }

    fn add_layer(&mut self, map: MapHandle, layer: LayerHandle) -> Result<()> {
        self.check("add_layer")?;
        self.calls.push(EngineCall::AddLayer(map, layer));
        Ok(())
    }

    fn create_select_control(&mut self, layer: LayerHandle) -> Result<ControlHandle> {
        self.check("create_select_control")?;
        let control = ControlHandle(self.handle());
        self.calls.push(EngineCall::CreateSelectControl(layer, control));
        Ok(control)
    }

    fn add_control(&mut self, map: MapHandle, control: ControlHandle) -> Result<()> {
        self.calls.push(EngineCall::AddControl(map, control));
        Ok(())
    }

    fn activate_control(&mut self, control: ControlHandle) -> Result<()> {
        self.calls.push(EngineCall::ActivateControl(control));
        Ok(())
    }

    fn transform(&mut self, point: LonLat, from: Projection, to: Projection) -> Result<LonLat> {
        self.calls.push(EngineCall::Transform(point, from, to));
        Ok(projection::transform(point, from, to))
    }

    fn set_center(&mut self, map: MapHandle, center: LonLat, zoom: u32) -> Result<()> {
        self.calls.push(EngineCall::SetCenter(map, center, zoom));
        Ok(())
    }

    fn create_popup(&mut self, spec: &PopupSpec) -> Result<PopupHandle> {
        self.check("create_popup")?;
        let popup = PopupHandle(self.handle());
        self.popups.insert(popup, spec.clone());
        self.calls.push(EngineCall::CreatePopup(popup));
        Ok(popup)
    }

    fn add_popup(&mut self, map: MapHandle, popup: PopupHandle, exclusive: bool) -> Result<()> {
        if exclusive {
            self.popups_on_map.clear();
        }
        self.popups_on_map.push(popup);
        self.calls.push(EngineCall::AddPopup(map, popup, exclusive));
        Ok(())
    }

    fn remove_popup(&mut self, map: MapHandle, popup: PopupHandle) -> Result<()> {
        self.popups_on_map.retain(|p| *p != popup);
        self.calls.push(EngineCall::RemovePopup(map, popup));
        Ok(())
    }

    fn destroy_popup(&mut self, popup: PopupHandle) -> Result<()> {
        self.popups.remove(&popup);
        self.calls.push(EngineCall::DestroyPopup(popup));
        Ok(())
    }

    fn feature_layer(&mut self, feature: &FeatureId) -> Result<Option<LayerHandle>> {
        Ok(self.attached_features.get(feature).copied())
    }

    fn unselect(&mut self, control: ControlHandle, feature: &FeatureId) -> Result<()> {
        self.calls.push(EngineCall::Unselect(control, feature.clone()));
        Ok(())
    }

    fn set_protocol_param(&mut self, protocol: ProtocolHandle, key: &str, value: &str) -> Result<()> {
        if let Some(p) = self.protocols.get_mut(&protocol) {
            p.params.insert(key.to_string(), value.to_string());
        }
        self.calls.push(EngineCall::SetProtocolParam(protocol, key.to_string(), value.to_string()));
        Ok(())
    }

    fn refresh_strategy(&mut self, strategy: StrategyHandle) -> Result<()> {
        self.calls.push(EngineCall::RefreshStrategy(strategy));
        Ok(())
    }
}

/// Data attributes and subscriptions, shared between clones so a test can
/// keep editing attributes after handing the binding to a controller.
#[derive(Debug, Clone)]
pub struct FakeBinding {
    element_id: String,
    attributes: Rc<RefCell<HashMap<String, String>>>,
    pub subscriptions: Rc<RefCell<Vec<(LayerHandle, Vec<FeatureEventKind>)>>>,
}

impl FakeBinding {
    pub fn new(element_id: &str) -> Self {
        FakeBinding {
            element_id: element_id.to_string(),
            attributes: Rc::new(RefCell::new(HashMap::new())),
            subscriptions: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A binding carrying every required attribute.
    pub fn configured(element_id: &str) -> Self {
        FakeBinding::new(element_id)
            .with(ATTR_API_URL, "/api/pois")
            .with(ATTR_INITIAL_LON, "8.54")
            .with(ATTR_INITIAL_LAT, "47.37")
            .with(ATTR_INITIAL_ZOOM, "12")
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: &str, value: &str) {
        self.attributes.borrow_mut().insert(key.to_string(), value.to_string());
    }
}

impl ViewBinding for FakeBinding {
    fn element_id(&self) -> &str {
        &self.element_id
    }

    fn data(&self, key: &str) -> Option<String> {
        self.attributes.borrow().get(key).cloned()
    }

    fn subscribe(&mut self, layer: LayerHandle, events: &[FeatureEventKind]) -> Result<()> {
        self.subscriptions.borrow_mut().push((layer, events.to_vec()));
        Ok(())
    }
}

pub fn feature(id: &str, title: &str, description: &str) -> FeatureRecord {
    FeatureRecord {
        id: FeatureId::from(id),
        attributes: FeatureAttributes {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            count: None,
        },
        bounds: Some(Bounds::new(0.0, 0.0, 2.0, 4.0)),
        cluster: None,
    }
}

pub fn cluster(id: &str, members: Vec<FeatureRecord>) -> FeatureRecord {
    FeatureRecord {
        id: FeatureId::from(id),
        attributes: FeatureAttributes {
            title: None,
            description: None,
            count: Some(members.len() as f64),
        },
        bounds: Some(Bounds::new(10.0, 20.0, 30.0, 40.0)),
        cluster: Some(members),
    }
}
