// The `MapView` export: one controller bound to one container element.
//
// Library events can arrive while the controller is already handling a
// call (unselecting a feature from a popup close raises the unselect
// event synchronously). Such events are queued and handled once the
// running call returns.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use js_sys::{Date, Function};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::controller::MapViewController;
use crate::dom_binding::DomBinding;
use crate::engine::PopupHandle;
use crate::error::{MapViewError, Result};
use crate::js_engine::JsMapEngine;
use crate::models::FeatureEvent;
use crate::module_state::ModuleState;
use crate::{console_error, console_log};

type JsController = MapViewController<JsMapEngine, DomBinding>;

enum ViewEvent {
    Feature(FeatureEvent),
    PopupClosed(PopupHandle),
}

struct ViewShared {
    element_id: String,
    controller: RefCell<Option<JsController>>,
    pending: RefCell<VecDeque<ViewEvent>>,
}

impl ViewShared {
    fn push(&self, event: ViewEvent) {
        self.pending.borrow_mut().push_back(event);
        self.drain();
    }

    fn drain(&self) {
        // Busy: the call holding the controller drains on its way out
        let Ok(mut guard) = self.controller.try_borrow_mut() else {
            return;
        };
        let Some(controller) = guard.as_mut() else {
            return;
        };
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            let result = match &event {
                ViewEvent::Feature(e) => controller.handle_event(e),
                ViewEvent::PopupClosed(popup) => controller.on_popup_close(*popup),
            };
            if let Err(e) = result {
                console_error!("#{}: {}", self.element_id, e);
            }
        }
    }

    fn with_controller<R>(&self, f: impl FnOnce(&mut JsController) -> Result<R>) -> Result<R> {
        let result = {
            let mut guard = self.controller.try_borrow_mut().map_err(|_| MapViewError::Busy)?;
            let controller = guard.as_mut().ok_or(MapViewError::Busy)?;
            f(controller)
        };
        self.drain();
        result
    }
}

impl Drop for ViewShared {
    fn drop(&mut self) {
        ModuleState::with_mut(|state| state.release_view(&self.element_id));
        console_log!("Map view detached from #{}", self.element_id);
    }
}

#[wasm_bindgen]
pub struct MapView {
    shared: Rc<ViewShared>,
    // Kept alive for as long as the library may call back into the view
    _on_feature_event: Closure<dyn Fn(JsValue)>,
    _on_popup_close: Closure<dyn Fn(u32)>,
}

#[wasm_bindgen]
impl MapView {
    /// Attaches a map view to `element`, which must carry an id and the
    /// `data-api-url` and `data-initial-*` attributes.
    #[wasm_bindgen(constructor)]
    pub fn new(element: Element) -> std::result::Result<MapView, JsValue> {
        let element_id = element.id();
        if element_id.is_empty() {
            return Err(MapViewError::MissingElementId.into());
        }
        ModuleState::with_mut(|state| state.register_view(&element_id, Date::now()))?;

        // From here on, dropping `shared` releases the element again
        let shared = Rc::new(ViewShared {
            element_id,
            controller: RefCell::new(None),
            pending: RefCell::new(VecDeque::new()),
        });

        let weak = Rc::downgrade(&shared);
        let on_feature_event = Closure::wrap(Box::new(move |payload: JsValue| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            match serde_wasm_bindgen::from_value::<FeatureEvent>(payload) {
                Ok(event) => shared.push(ViewEvent::Feature(event)),
                Err(e) => console_error!("#{}: {}", shared.element_id, MapViewError::from(e)),
            }
        }) as Box<dyn Fn(JsValue)>);

        let weak = Rc::downgrade(&shared);
        let on_popup_close = Closure::wrap(Box::new(move |popup: u32| {
            if let Some(shared) = weak.upgrade() {
                shared.push(ViewEvent::PopupClosed(PopupHandle(popup)));
            }
        }) as Box<dyn Fn(u32)>);

        let engine = JsMapEngine::new(on_popup_close.as_ref().unchecked_ref::<Function>().clone());
        let binding = DomBinding::new(element, on_feature_event.as_ref().unchecked_ref::<Function>().clone());
        let controller = MapViewController::initialize(engine, binding)?;

        *shared.controller.borrow_mut() = Some(controller);
        shared.drain();

        Ok(MapView {
            shared,
            _on_feature_event: on_feature_event,
            _on_popup_close: on_popup_close,
        })
    }

    #[wasm_bindgen(getter, js_name = elementId)]
    pub fn element_id(&self) -> String {
        self.shared.element_id.clone()
    }

    /// Re-reads the filter attributes and reloads the points of interest.
    pub fn refresh(&self) -> std::result::Result<(), JsValue> {
        self.shared.with_controller(|controller| controller.refresh())?;
        ModuleState::with_mut(|state| state.record_refresh(&self.shared.element_id));
        Ok(())
    }

    #[wasm_bindgen(js_name = zoomTo)]
    pub fn zoom_to(&self, lon: f64, lat: f64, zoom: u32) -> std::result::Result<(), JsValue> {
        self.shared
            .with_controller(|controller| controller.zoom_to(lon, lat, zoom))
            .map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = openPopupCount)]
    pub fn open_popup_count(&self) -> std::result::Result<u32, JsValue> {
        self.shared
            .with_controller(|controller| Ok(controller.open_popup_count() as u32))
            .map_err(JsValue::from)
    }
}
