use lazy_static::lazy_static;
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{MapViewError, Result};
use crate::models::{ViewRecord, ViewStats};

// Module state shared by every map view in the page
pub struct ModuleState {
    // Attached views keyed by container element id
    pub views: HashMap<String, ViewRecord>,

    // Stats
    pub total_attached: usize,
    pub total_refreshes: usize,
}

// Create a global static instance of the module state
lazy_static! {
    static ref MODULE_STATE: ReentrantMutex<RefCell<ModuleState>> =
        ReentrantMutex::new(RefCell::new(ModuleState::new()));
}

impl ModuleState {
    pub fn new() -> Self {
        ModuleState {
            views: HashMap::new(),
            total_attached: 0,
            total_refreshes: 0,
        }
    }

    pub fn with_mut<F, R>(f: F) -> R
    where
        F: FnOnce(&mut ModuleState) -> R,
    {
        let guard = MODULE_STATE.lock();
        let mut borrow = guard.borrow_mut();
        f(&mut borrow)
    }

    pub fn with<F, R>(f: F) -> R
    where
        F: FnOnce(&ModuleState) -> R,
    {
        let guard = MODULE_STATE.lock();
        let borrow = guard.borrow();
        f(&borrow)
    }

    /// Claims an element for a new view. Each element hosts one view.
    pub fn register_view(&mut self, element_id: &str, now: f64) -> Result<()> {
        if self.is_attached(element_id) {
            return Err(MapViewError::AlreadyAttached(element_id.to_string()));
        }
        self.views.insert(
            element_id.to_string(),
            ViewRecord {
                element_id: element_id.to_string(),
                attached_at: now,
                refreshes: 0,
            },
        );
        self.total_attached += 1;
        Ok(())
    }

    pub fn release_view(&mut self, element_id: &str) -> Option<ViewRecord> {
        self.views.remove(element_id)
    }

    pub fn is_attached(&self, element_id: &str) -> bool {
        self.views.contains_key(element_id)
    }

    pub fn record_refresh(&mut self, element_id: &str) {
        if let Some(view) = self.views.get_mut(element_id) {
            view.refreshes += 1;
        }
        self.total_refreshes += 1;
    }

    // Get view statistics
    pub fn get_stats(&self) -> ViewStats {
        let mut views: Vec<ViewRecord> = self.views.values().cloned().collect();
        views.sort_by(|a, b| a.element_id.cmp(&b.element_id));
        ViewStats {
            attached_views: self.views.len(),
            total_attached: self.total_attached,
            total_refreshes: self.total_refreshes,
            views,
        }
    }
}
