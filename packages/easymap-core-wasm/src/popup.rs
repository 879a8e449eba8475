// Popup content and bookkeeping for selected features
use std::collections::HashMap;

use crate::engine::{PopupHandle, PopupSpec};
use crate::models::{FeatureId, FeatureRecord, LonLat, Size};

pub const POPUP_ID: &str = "featurePopup";
pub const POPUP_SIZE: Size = Size::new(300, 100);
pub const POPUP_MAX_SIZE: Size = Size::new(500, 300);

/// Cluster popups list at most this many member titles.
pub const MAX_CLUSTER_TITLES: usize = 50;
pub const LINE_BREAK: &str = "<br/>";
pub const TRUNCATION_MARKER: &str = "(...)";

/// HTML shown in the popup of a selected feature or cluster.
///
/// Attribute text is inserted as-is: the feed is expected to deliver
/// popup-ready HTML.
pub fn format_popup_content(feature: &FeatureRecord) -> String {
    match feature.cluster.as_deref() {
        None => describe(feature),
        Some([single]) => describe(single),
        Some(members) => {
            let mut content = String::new();
            for member in members.iter().take(MAX_CLUSTER_TITLES) {
                content.push_str(member.title());
                content.push_str(LINE_BREAK);
            }
            if members.len() > MAX_CLUSTER_TITLES {
                content.push_str(TRUNCATION_MARKER);
            }
            content
        }
    }
}

fn describe(feature: &FeatureRecord) -> String {
    format!("{}{}{}", feature.title(), LINE_BREAK, feature.description())
}

pub fn popup_spec(anchor: LonLat, content_html: String) -> PopupSpec {
    PopupSpec {
        id: POPUP_ID.to_string(),
        anchor,
        size: POPUP_SIZE,
        max_size: POPUP_MAX_SIZE,
        content_html,
        close_box: true,
        pan_map_if_out_of_view: true,
    }
}

/// Two-way index between features and their open popups. At most one
/// popup is registered per feature.
#[derive(Debug, Default)]
pub struct PopupRegistry {
    by_feature: HashMap<FeatureId, PopupHandle>,
    by_popup: HashMap<PopupHandle, FeatureId>,
}

impl PopupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `popup` with `feature`, returning the popup it replaces.
    pub fn insert(&mut self, feature: FeatureId, popup: PopupHandle) -> Option<PopupHandle> {
        let previous = self.by_feature.insert(feature.clone(), popup);
        if let Some(old) = previous {
            self.by_popup.remove(&old);
        }
        self.by_popup.insert(popup, feature);
        previous
    }

    pub fn popup_for(&self, feature: &FeatureId) -> Option<PopupHandle> {
        self.by_feature.get(feature).copied()
    }

    pub fn feature_for(&self, popup: PopupHandle) -> Option<&FeatureId> {
        self.by_popup.get(&popup)
    }

    pub fn remove_feature(&mut self, feature: &FeatureId) -> Option<PopupHandle> {
        let popup = self.by_feature.remove(feature)?;
        self.by_popup.remove(&popup);
        Some(popup)
    }

    /// Empties the registry, returning every popup it held.
    pub fn drain(&mut self) -> Vec<PopupHandle> {
        self.by_popup.clear();
        self.by_feature.drain().map(|(_, popup)| popup).collect()
    }

    pub fn len(&self) -> usize {
        self.by_feature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_feature.is_empty()
    }
}
