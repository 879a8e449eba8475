use wasm_bindgen::prelude::*;
use serde_wasm_bindgen::to_value;

// Create a console module for logging
pub mod console;
// Import our error types
pub mod error;
// Import our models
pub mod models;
// Import our view configuration
pub mod config;
// Import the engine and view framework abstractions
pub mod engine;
// Import our projection helpers
pub mod projection;
// Import the POI layer styling
pub mod style;
// Import popup formatting and bookkeeping
pub mod popup;
// Import map and layer construction
pub mod layers;
// Import the map view controller
pub mod controller;
// Import our module state management
mod module_state;
// Import the JS-backed engine and DOM binding
mod js_engine;
mod dom_binding;
// Import the MapView export
mod view;

#[cfg(test)]
mod test_support;

use models::LonLat;
use module_state::ModuleState;
use projection::Projection;

pub use controller::MapViewController;
pub use engine::{MapEngine, ViewBinding};
pub use error::{MapViewError, Result};
pub use view::MapView;

// Enable better panic messages in console during development
#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

// Use the macros from our console module
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => (crate::console::log(&format!($($t)*)))
}

#[macro_export]
macro_rules! console_warn {
    ($($t:tt)*) => (crate::console::warn(&format!($($t)*)))
}

#[macro_export]
macro_rules! console_error {
    ($($t:tt)*) => (crate::console::error(&format!($($t)*)))
}

use std::sync::Once;
static INIT: Once = Once::new();

// This sets up the wasm_bindgen start functionality
#[wasm_bindgen(start)]
pub fn start() {
    INIT.call_once(|| {
        // Set the panic hook for better error messages
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        console_log!("WASM module initialized successfully");
    });
}

// Function to get map view statistics
#[wasm_bindgen]
pub fn get_view_stats() -> std::result::Result<JsValue, JsValue> {
    let stats = ModuleState::with(|state| state.get_stats());
    Ok(to_value(&stats)?)
}

/// Convert a point between EPSG:4326 and EPSG:3857/900913.
#[wasm_bindgen]
pub fn transform_coordinate(lon: f64, lat: f64, from_epsg: u32, to_epsg: u32) -> std::result::Result<JsValue, JsValue> {
    let from = Projection::from_epsg(from_epsg)
        .ok_or_else(|| JsValue::from_str(&format!("Unsupported EPSG code: {}", from_epsg)))?;
    let to = Projection::from_epsg(to_epsg)
        .ok_or_else(|| JsValue::from_str(&format!("Unsupported EPSG code: {}", to_epsg)))?;

    let point = projection::transform(LonLat::new(lon, lat), from, to);
    Ok(to_value(&point)?)
}

// Get information about the module and the map defaults it applies
#[wasm_bindgen]
pub fn get_wasm_info() -> String {
    serde_json::to_string(&serde_json::json!({
        "zoom_levels": config::ZOOM_LEVELS,
        "units": config::UNITS,
        "max_resolution": config::MAX_RESOLUTION,
        "cluster_distance": layers::CLUSTER_DISTANCE,
        "cluster_threshold": layers::CLUSTER_THRESHOLD,
        "max_cluster_titles": popup::MAX_CLUSTER_TITLES,
    }))
    .unwrap_or_else(|_| "{}".to_string())
}

// Test function to verify module initialization
#[wasm_bindgen]
pub fn test_initialization() -> String {
    // Test calling start multiple times to ensure no panic
    start();
    start();
    start();
    "Initialization test passed - no panics occurred".to_string()
}
