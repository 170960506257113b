//! UI preferences
//!
//! Persisted alongside the token in the same storage area, as plain
//! strings, absent-safe.

use crate::api::storage::{StorageArea, SIDEBAR_COLLAPSED_KEY};

#[derive(Debug, Clone)]
pub struct UiPrefs {
    area: StorageArea,
}

impl UiPrefs {
    pub fn new(area: StorageArea) -> Self {
        Self { area }
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.area
            .get(SIDEBAR_COLLAPSED_KEY)
            .is_some_and(|v| v == "true")
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        self.area
            .set(SIDEBAR_COLLAPSED_KEY, if collapsed { "true" } else { "false" });
    }
}
