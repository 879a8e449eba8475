// Error types for the map view controller.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Result type alias using MapViewError.
pub type Result<T> = std::result::Result<T, MapViewError>;

#[derive(Debug, Error)]
pub enum MapViewError {
    // === Configuration Errors ===
    #[error("Missing required attribute: data-{0}")]
    MissingAttribute(String),

    #[error("Invalid value for 'data-{key}': {value:?}")]
    InvalidAttribute { key: String, value: String },

    #[error("Container element has no id")]
    MissingElementId,

    #[error("A map view is already attached to element '{0}'")]
    AlreadyAttached(String),

    // === Engine Errors ===
    #[error("Map engine call '{call}' failed: {message}")]
    Engine { call: &'static str, message: String },

    #[error("Invalid feature payload: {0}")]
    InvalidFeature(String),

    #[error("Map view is busy handling another call")]
    Busy,
}

impl MapViewError {
    pub fn engine(call: &'static str, err: JsValue) -> Self {
        let message = err
            .as_string()
            .unwrap_or_else(|| format!("{:?}", err));
        MapViewError::Engine { call, message }
    }
}

impl From<serde_wasm_bindgen::Error> for MapViewError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        MapViewError::InvalidFeature(e.to_string())
    }
}

impl From<MapViewError> for JsValue {
    fn from(e: MapViewError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
