// The map view controller: builds the map for one container element and
// reacts to feature selection on its point-of-interest layer.

use crate::config::{self, ViewConfiguration};
use crate::engine::{ControlHandle, LayerHandle, MapEngine, MapHandle, PopupHandle, ViewBinding};
use crate::error::{MapViewError, Result};
use crate::layers::{self, PoiLayer};
use crate::models::{FeatureEvent, FeatureEventKind, FeatureId, FeatureRecord, LonLat};
use crate::popup::{format_popup_content, popup_spec, PopupRegistry};
use crate::projection::Projection;
use crate::{console_log, console_warn};

const SUBSCRIBED_EVENTS: [FeatureEventKind; 2] =
    [FeatureEventKind::Selected, FeatureEventKind::Unselected];

pub struct MapViewController<E: MapEngine, B: ViewBinding> {
    engine: E,
    binding: B,
    config: ViewConfiguration,
    map: MapHandle,
    base_layer: LayerHandle,
    poi: PoiLayer,
    select_control: ControlHandle,
    popups: PopupRegistry,
}

impl<E: MapEngine, B: ViewBinding> MapViewController<E, B> {
    /// Attaches a controller to the binding's element: reads the
    /// configuration, builds the map and its layers, wires selection and
    /// centers the map on the initial view.
    pub fn initialize(mut engine: E, mut binding: B) -> Result<Self> {
        let element_id = binding.element_id().to_string();
        if element_id.is_empty() {
            return Err(MapViewError::MissingElementId);
        }
        let config = ViewConfiguration::from_binding(&binding)?;

        let map = layers::create_map(&mut engine, &element_id, &config)?;

        let base_layer = layers::create_base_layer(&mut engine)?;
        engine.add_layer(map, base_layer)?;

        let poi = layers::create_poi_layer(&mut engine, &config)?;
        engine.add_layer(map, poi.layer)?;

        let select_control = layers::create_select_control(&mut engine, poi.layer)?;
        engine.add_control(map, select_control)?;
        engine.activate_control(select_control)?;
        binding.subscribe(poi.layer, &SUBSCRIBED_EVENTS)?;

        let mut controller = MapViewController {
            engine,
            binding,
            config,
            map,
            base_layer,
            poi,
            select_control,
            popups: PopupRegistry::new(),
        };
        controller.center_map()?;

        console_log!("Map view attached to #{}", element_id);
        Ok(controller)
    }

    pub fn center_map(&mut self) -> Result<()> {
        let initial = self.config.initial;
        self.zoom_to(initial.lon, initial.lat, initial.zoom)
    }

    /// Centers the map on a geographic position at `zoom`.
    pub fn zoom_to(&mut self, lon: f64, lat: f64, zoom: u32) -> Result<()> {
        let center = self.engine.transform(
            LonLat::new(lon, lat),
            Projection::Geographic,
            Projection::SphericalMercator,
        )?;
        self.engine.set_center(self.map, center, zoom)
    }

    /// Writes the current filter attributes into the fetch protocol and
    /// forces one reload of the POI layer.
    pub fn refresh(&mut self) -> Result<()> {
        let filter = config::parse_filter(&self.binding);
        for (key, value) in filter.query_pairs() {
            self.engine.set_protocol_param(self.poi.protocol, key, value)?;
        }
        self.engine.refresh_strategy(self.poi.refresh_strategy)?;
        self.config.filter = filter;
        console_log!("Refreshing POIs for #{}", self.binding.element_id());
        Ok(())
    }

    pub fn handle_event(&mut self, event: &FeatureEvent) -> Result<()> {
        match event.kind {
            FeatureEventKind::Selected => self.on_feature_select(&event.feature),
            FeatureEventKind::Unselected => self.on_feature_unselect(&event.feature.id),
        }
    }

    pub fn on_feature_select(&mut self, feature: &FeatureRecord) -> Result<()> {
        let anchor = feature.anchor().ok_or_else(|| {
            MapViewError::InvalidFeature(format!("feature {} has no geometry bounds", feature.id))
        })?;

        // The new popup is added exclusively, so every registered popup
        // leaves the map. Features reloaded away never raise an unselect.
        for popup in self.popups.drain() {
            self.engine.remove_popup(self.map, popup)?;
            self.engine.destroy_popup(popup)?;
        }

        let content = format_popup_content(feature);
        let popup = self.engine.create_popup(&popup_spec(anchor, content))?;
        self.popups.insert(feature.id.clone(), popup);
        self.engine.add_popup(self.map, popup, true)
    }

    /// Tears down the feature's popup. Does nothing when it has none.
    pub fn on_feature_unselect(&mut self, feature: &FeatureId) -> Result<()> {
        if let Some(popup) = self.popups.remove_feature(feature) {
            self.engine.remove_popup(self.map, popup)?;
            self.engine.destroy_popup(popup)?;
        }
        Ok(())
    }

    /// Close box of a popup clicked. A feature still on its layer is
    /// unselected through the control, which raises the unselect event
    /// that removes the popup; otherwise the popup is destroyed here.
    pub fn on_popup_close(&mut self, popup: PopupHandle) -> Result<()> {
        let Some(feature) = self.popups.feature_for(popup).cloned() else {
            console_warn!("Close requested for unknown popup {:?}", popup);
            return Ok(());
        };
        if self.engine.feature_layer(&feature)?.is_some() {
            self.engine.unselect(self.select_control, &feature)
        } else {
            self.on_feature_unselect(&feature)
        }
    }

    pub fn popup_for(&self, feature: &FeatureId) -> Option<PopupHandle> {
        self.popups.popup_for(feature)
    }

    pub fn open_popup_count(&self) -> usize {
        self.popups.len()
    }

    pub fn config(&self) -> &ViewConfiguration {
        &self.config
    }

    pub fn map(&self) -> MapHandle {
        self.map
    }

    pub fn base_layer(&self) -> LayerHandle {
        self.base_layer
    }

    pub fn poi_layer(&self) -> &PoiLayer {
        &self.poi
    }

    pub fn select_control(&self) -> ControlHandle {
        self.select_control
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }
}
