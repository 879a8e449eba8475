// View configuration read from the container element's data attributes.

use serde::{Deserialize, Serialize};

use crate::engine::ViewBinding;
use crate::error::{MapViewError, Result};
use crate::models::{Bounds, WORLD_EXTENT};

pub const ATTR_API_URL: &str = "api-url";
pub const ATTR_INITIAL_LON: &str = "initial-lon";
pub const ATTR_INITIAL_LAT: &str = "initial-lat";
pub const ATTR_INITIAL_ZOOM: &str = "initial-zoom";
pub const ATTR_BOUNDS_LEFT: &str = "map-bounds-left";
pub const ATTR_BOUNDS_RIGHT: &str = "map-bounds-right";
pub const ATTR_BOUNDS_TOP: &str = "map-bounds-top";
pub const ATTR_BOUNDS_BOTTOM: &str = "map-bounds-bottom";
pub const ATTR_FILTER_CATEGORY: &str = "filter-category";
pub const ATTR_FILTER_SUBCATEGORY: &str = "filter-subcategory";
pub const ATTR_FILTER_SOURCE: &str = "filter-map-source";
pub const ATTR_FILTER_KEYWORDS: &str = "filter-keywords";

pub const ZOOM_LEVELS: u32 = 18;
pub const UNITS: &str = "meters";
pub const MAX_RESOLUTION: f64 = 156543.0;

/// Query filter sent with every feature fetch. Field names are the
/// query parameter names the API expects.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    #[serde(rename = "cat")]
    pub category: String,
    #[serde(rename = "subcat")]
    pub subcategory: String,
    #[serde(rename = "src")]
    pub source: String,
    #[serde(rename = "kw")]
    pub keywords: String,
}

impl FilterParams {
    pub fn query_pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("cat", self.category.as_str()),
            ("subcat", self.subcategory.as_str()),
            ("src", self.source.as_str()),
            ("kw", self.keywords.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialView {
    pub lon: f64,
    pub lat: f64,
    pub zoom: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfiguration {
    pub api_url: String,
    pub bounds: Bounds,
    pub zoom_levels: u32,
    pub units: String,
    pub max_resolution: f64,
    pub initial: InitialView,
    pub filter: FilterParams,
}

impl ViewConfiguration {
    pub fn from_binding<B: ViewBinding + ?Sized>(binding: &B) -> Result<Self> {
        Ok(ViewConfiguration {
            api_url: required(binding, ATTR_API_URL)?,
            bounds: parse_bounds(binding)?,
            zoom_levels: parse_zoom_levels(),
            units: parse_units(),
            max_resolution: parse_max_resolution(),
            initial: parse_initial_view(binding)?,
            filter: parse_filter(binding),
        })
    }
}

// Empty attributes count as unset
fn attribute<B: ViewBinding + ?Sized>(binding: &B, key: &str) -> Option<String> {
    binding
        .data(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<B: ViewBinding + ?Sized>(binding: &B, key: &str) -> Result<String> {
    attribute(binding, key).ok_or_else(|| MapViewError::MissingAttribute(key.to_string()))
}

fn parse_number<T: std::str::FromStr>(key: &str, value: String) -> Result<T> {
    value.parse::<T>().map_err(|_| MapViewError::InvalidAttribute {
        key: key.to_string(),
        value,
    })
}

fn number_or<B: ViewBinding + ?Sized>(binding: &B, key: &str, default: f64) -> Result<f64> {
    match attribute(binding, key) {
        Some(value) => parse_number(key, value),
        None => Ok(default),
    }
}

/// Map extent; each unset side falls back to the world extent.
pub fn parse_bounds<B: ViewBinding + ?Sized>(binding: &B) -> Result<Bounds> {
    Ok(Bounds::new(
        number_or(binding, ATTR_BOUNDS_LEFT, -WORLD_EXTENT)?,
        number_or(binding, ATTR_BOUNDS_BOTTOM, -WORLD_EXTENT)?,
        number_or(binding, ATTR_BOUNDS_RIGHT, WORLD_EXTENT)?,
        number_or(binding, ATTR_BOUNDS_TOP, WORLD_EXTENT)?,
    ))
}

// Zoom levels, units and max resolution are not read from the element.
pub fn parse_zoom_levels() -> u32 {
    ZOOM_LEVELS
}

pub fn parse_units() -> String {
    UNITS.to_string()
}

pub fn parse_max_resolution() -> f64 {
    MAX_RESOLUTION
}

pub fn parse_initial_view<B: ViewBinding + ?Sized>(binding: &B) -> Result<InitialView> {
    Ok(InitialView {
        lon: parse_number(ATTR_INITIAL_LON, required(binding, ATTR_INITIAL_LON)?)?,
        lat: parse_number(ATTR_INITIAL_LAT, required(binding, ATTR_INITIAL_LAT)?)?,
        zoom: parse_number(ATTR_INITIAL_ZOOM, required(binding, ATTR_INITIAL_ZOOM)?)?,
    })
}

// Filter values go out as written, without trimming
pub fn parse_filter<B: ViewBinding + ?Sized>(binding: &B) -> FilterParams {
    let text = |key: &str| binding.data(key).unwrap_or_default();
    FilterParams {
        category: text(ATTR_FILTER_CATEGORY),
        subcategory: text(ATTR_FILTER_SUBCATEGORY),
        source: text(ATTR_FILTER_SOURCE),
        keywords: text(ATTR_FILTER_KEYWORDS),
    }
}
