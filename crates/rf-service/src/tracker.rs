//! Top-level URL of each tab.
//!
//! Written on main-frame navigations, read when reporting sub-resource
//! decisions. Entries are never removed; a closed tab's entry is just unused.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Tab ids below zero belong to requests not tied to a tab.
#[derive(Debug, Default)]
pub struct TabTracker {
    tabs: RwLock<HashMap<i32, String>>,
}

impl TabTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a top-level navigation.
    pub fn record(&self, tab_id: i32, url: &str) {
        if tab_id < 0 {
            return;
        }
        let mut tabs = self.tabs.write().unwrap_or_else(PoisonError::into_inner);
        tabs.insert(tab_id, url.to_string());
    }

    /// Last top-level URL seen for `tab_id`.
    pub fn url_for(&self, tab_id: i32) -> Option<String> {
        let tabs = self.tabs.read().unwrap_or_else(PoisonError::into_inner);
        tabs.get(&tab_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.tabs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_lookup() {
        let tracker = TabTracker::new();
        assert_eq!(tracker.url_for(3), None);

        tracker.record(3, "https://example.com/");
        tracker.record(4, "https://rust-lang.org/");
        assert_eq!(tracker.url_for(3).as_deref(), Some("https://example.com/"));
        assert_eq!(tracker.url_for(4).as_deref(), Some("https://rust-lang.org/"));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_navigation_overwrites() {
        let tracker = TabTracker::new();
        tracker.record(3, "https://example.com/");
        tracker.record(3, "https://example.org/next");
        assert_eq!(tracker.url_for(3).as_deref(), Some("https://example.org/next"));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_requests_outside_tabs_are_not_recorded() {
        let tracker = TabTracker::new();
        tracker.record(-1, "https://example.com/");
        assert!(tracker.is_empty());
        assert_eq!(tracker.url_for(-1), None);
    }
}
