//! Filter state store
//!
//! Holds the selected category, the sort order, and the one-shot flag that
//! records whether the category list has loaded. Observers subscribe through
//! a `tokio::sync::watch` channel and see every effective change.

use tokio::sync::watch;

use crate::data::SortOrder;

/// Current filter selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Selected category; empty means all categories
    pub selected_category: String,
    pub sort_order: SortOrder,
    /// Set once the category list has been fetched
    pub has_loaded_categories: bool,
}

/// Owner of the filter state
#[derive(Debug)]
pub struct FilterStore {
    sender: watch::Sender<FilterState>,
}

impl FilterStore {
    /// Creates a store with nothing selected
    pub fn new() -> Self {
        Self::with_state(FilterState::default())
    }

    /// Creates a store with an initial selection
    pub fn with_state(state: FilterState) -> Self {
        let (sender, _) = watch::channel(state);
        Self { sender }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> FilterState {
        self.sender.borrow().clone()
    }

    pub fn selected_category(&self) -> String {
        self.sender.borrow().selected_category.clone()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sender.borrow().sort_order
    }

    pub fn has_loaded_categories(&self) -> bool {
        self.sender.borrow().has_loaded_categories
    }

    /// Selects a category; an empty string selects all categories
    pub fn set_selected_category(&self, category: impl Into<String>) {
        let category = category.into();
        self.sender.send_if_modified(|state| {
            if state.selected_category == category {
                return false;
            }
            tracing::debug!(%category, "category selected");
            state.selected_category = category;
            true
        });
    }

    pub fn set_sort_order(&self, sort_order: SortOrder) {
        self.sender.send_if_modified(|state| {
            if state.sort_order == sort_order {
                return false;
            }
            tracing::debug!(sort = %sort_order, "sort order selected");
            state.sort_order = sort_order;
            true
        });
    }

    pub fn set_has_loaded_categories(&self, loaded: bool) {
        self.sender.send_if_modified(|state| {
            if state.has_loaded_categories == loaded {
                return false;
            }
            state.has_loaded_categories = loaded;
            true
        });
    }

    /// Returns a receiver that is notified on every change
    ///
    /// The current state counts as already seen.
    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.sender.subscribe()
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_empty() {
        let store = FilterStore::new();
        let state = store.state();

        assert_eq!(state.selected_category, "");
        assert_eq!(state.sort_order, SortOrder::Unsorted);
        assert!(!state.has_loaded_categories);
    }

    #[test]
    fn test_setters_update_state() {
        let store = FilterStore::new();

        store.set_selected_category("electronics");
        store.set_sort_order(SortOrder::Desc);
        store.set_has_loaded_categories(true);

        assert_eq!(store.selected_category(), "electronics");
        assert_eq!(store.sort_order(), SortOrder::Desc);
        assert!(store.has_loaded_categories());
    }

    #[test]
    fn test_subscriber_sees_changes() {
        let store = FilterStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.set_selected_category("jewelery");

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().selected_category, "jewelery");
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_setting_same_value_does_not_notify() {
        let store = FilterStore::with_state(FilterState {
            selected_category: "electronics".to_string(),
            sort_order: SortOrder::Asc,
            has_loaded_categories: false,
        });
        let rx = store.subscribe();

        store.set_selected_category("electronics");
        store.set_sort_order(SortOrder::Asc);
        store.set_has_loaded_categories(false);

        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_clearing_category_selects_all() {
        let store = FilterStore::new();
        store.set_selected_category("electronics");
        store.set_selected_category("");
        assert_eq!(store.selected_category(), "");
    }
}
