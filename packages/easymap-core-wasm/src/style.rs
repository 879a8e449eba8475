// Styling of the point-of-interest layer
use serde::{Deserialize, Serialize};

pub const MIN_POINT_RADIUS: f64 = 10.0;
pub const MAX_POINT_RADIUS: f64 = 50.0;

// Template placeholders resolved per feature by the style context
pub const RADIUS_TEMPLATE: &str = "${radius}";
pub const COUNT_TEMPLATE: &str = "${count}";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Symbolizer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
}

/// Render intents for the layer. The select intent only overrides what it sets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StyleMap {
    #[serde(rename = "default")]
    pub default_style: Symbolizer,
    pub select: Symbolizer,
}

pub fn poi_style_map() -> StyleMap {
    StyleMap {
        default_style: Symbolizer {
            point_radius: Some(RADIUS_TEMPLATE.to_string()),
            fill_color: Some("#ff9909".to_string()),
            fill_opacity: Some(0.9),
            stroke_color: Some("#f15800".to_string()),
            stroke_width: Some(10.0),
            stroke_opacity: Some(0.4),
            label: Some(COUNT_TEMPLATE.to_string()),
            font_color: Some("#ffffff".to_string()),
        },
        select: Symbolizer {
            fill_color: Some("#8aeeef".to_string()),
            stroke_color: Some("#32a8a9".to_string()),
            ..Default::default()
        },
    }
}

/// Marker radius for a feature with the given `count` attribute.
pub fn point_radius(count: Option<f64>) -> f64 {
    match count {
        Some(c) if !c.is_nan() => c.clamp(MIN_POINT_RADIUS, MAX_POINT_RADIUS),
        _ => MIN_POINT_RADIUS,
    }
}

pub fn count_label(count: Option<f64>) -> String {
    match count {
        Some(c) if c.is_finite() && c.fract() == 0.0 => format!("{}", c as i64),
        Some(c) if !c.is_nan() => c.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_is_clamped() {
        assert_eq!(point_radius(Some(2.0)), 10.0);
        assert_eq!(point_radius(Some(27.0)), 27.0);
        assert_eq!(point_radius(Some(500.0)), 50.0);
        assert_eq!(point_radius(None), 10.0);
        assert_eq!(point_radius(Some(f64::NAN)), 10.0);
    }

    #[test]
    fn test_count_label() {
        assert_eq!(count_label(Some(12.0)), "12");
        assert_eq!(count_label(Some(2.5)), "2.5");
        assert_eq!(count_label(None), "");
    }

    #[test]
    fn test_style_map_serialization() {
        let json = serde_json::to_value(poi_style_map()).unwrap();
        assert_eq!(json["default"]["pointRadius"], "${radius}");
        assert_eq!(json["default"]["fillColor"], "#ff9909");
        assert_eq!(json["default"]["strokeWidth"], 10.0);
        assert_eq!(json["default"]["fontColor"], "#ffffff");
        assert_eq!(
            json["select"],
            serde_json::json!({"fillColor": "#8aeeef", "strokeColor": "#32a8a9"})
        );
    }
}
