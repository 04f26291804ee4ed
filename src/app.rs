//! Application state management for storeview
//!
//! This module contains the main application state: the filter store, the
//! products and categories query states, key handling, and the transitions
//! driven by finished fetches.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::watch;

use crate::cache::{QueryKey, QueryState};
use crate::coordinator::CategoryCoordinator;
use crate::data::{Product, SortOrder};
use crate::fetch::{FetchMessage, Fetcher};
use crate::store::{FilterState, FilterStore};

/// Label of the empty category option
pub const ALL_CATEGORIES_LABEL: &str = "All Categories";

/// Open selector popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Picker {
    /// Category selector with the highlighted option index
    Category(usize),
    /// Sort selector with the highlighted option index
    Sort(usize),
}

/// Main application struct managing state and data
pub struct App {
    /// Filter selection shared with the query layer
    pub store: FilterStore,
    /// Subscription to filter changes
    filters: watch::Receiver<FilterState>,
    /// Gate for the category list query
    pub coordinator: CategoryCoordinator,
    /// Status of the products query for the current filters
    pub products: QueryState<Vec<Product>>,
    /// Status of the category list query
    pub categories: QueryState<Vec<String>>,
    /// Key of the products query the view currently shows
    current_key: QueryKey,
    /// Index of the selected card
    pub selected_index: usize,
    /// Cards per grid row, updated from the terminal width
    pub columns: usize,
    /// Open selector popup, if any
    pub picker: Option<Picker>,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Time of the last successful products load
    pub last_updated: Option<DateTime<Local>>,
    fetcher: Fetcher,
}

impl App {
    /// Creates a new App with an initial filter selection
    ///
    /// Nothing is fetched until [`App::mount`] is called.
    pub fn new(initial_filters: FilterState, fetcher: Fetcher) -> Self {
        let current_key =
            QueryKey::products(initial_filters.selected_category.clone(), initial_filters.sort_order);
        let store = FilterStore::with_state(initial_filters);
        let filters = store.subscribe();

        Self {
            store,
            filters,
            coordinator: CategoryCoordinator::new(),
            products: QueryState::Idle,
            categories: QueryState::Idle,
            current_key,
            selected_index: 0,
            columns: 1,
            picker: None,
            show_help: false,
            should_quit: false,
            last_updated: None,
            fetcher,
        }
    }

    /// Key of the products query currently shown
    pub fn current_key(&self) -> &QueryKey {
        &self.current_key
    }

    /// Shows the product view: starts the products query and arms the
    /// category gate. Must be called from within a tokio runtime.
    pub fn mount(&mut self) {
        self.coordinator.mount();
        self.request_products();
    }

    /// Products of the current query, empty unless it succeeded
    pub fn product_list(&self) -> &[Product] {
        self.products
            .data()
            .map(|products| products.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the number of products shown
    pub fn product_count(&self) -> usize {
        self.product_list().len()
    }

    /// Returns the currently selected product, if any
    pub fn selected_product(&self) -> Option<&Product> {
        self.product_list().get(self.selected_index)
    }

    /// Options of the category selector as (value, label) pairs
    pub fn category_options(&self) -> Vec<(String, String)> {
        let mut options = vec![(String::new(), ALL_CATEGORIES_LABEL.to_string())];
        if let Some(categories) = self.categories.data() {
            options.extend(categories.iter().map(|c| (c.clone(), c.clone())));
        }
        options
    }

    /// Label of the selected category
    pub fn category_label(&self) -> String {
        let selected = self.store.selected_category();
        if selected.is_empty() {
            ALL_CATEGORIES_LABEL.to_string()
        } else {
            selected
        }
    }

    /// Recomputes the products query when the filters changed
    pub fn sync_filters(&mut self) {
        if !self.filters.has_changed().unwrap_or(false) {
            return;
        }
        let state = self.filters.borrow_and_update().clone();
        let key = QueryKey::products(state.selected_category, state.sort_order);
        if key != self.current_key {
            self.request_products();
        }
    }

    /// Shows the products for the current filters, fetching if needed
    fn request_products(&mut self) {
        let state = self.store.state();
        let key = QueryKey::products(state.selected_category, state.sort_order);
        if key != self.current_key {
            self.selected_index = 0;
        }
        self.current_key = key.clone();

        let cache = self.fetcher.products_cache();
        let entry = cache.get(&key);
        let fresh = entry
            .as_ref()
            .is_some_and(|e| e.is_fresh(cache.stale_time()));

        match entry.and_then(|e| e.data) {
            Some(data) if fresh => {
                tracing::debug!(?key, "showing cached products");
                self.products = QueryState::Success(data);
                self.on_products_success();
                return;
            }
            // Stale data stays visible while it is refetched
            Some(data) => self.products = QueryState::Success(data),
            None => self.products = QueryState::Loading,
        }

        self.fetcher.spawn_products(key);
    }

    /// Drops the cached products for the current filters and refetches
    ///
    /// Does nothing while a request for the current filters is running; its
    /// result is already on the way.
    pub fn refresh(&mut self) {
        let cache = self.fetcher.products_cache();
        if cache.is_in_flight(&self.current_key) {
            tracing::debug!(key = ?self.current_key, "refresh joins running request");
            return;
        }
        cache.invalidate(&self.current_key);
        if !self.products.is_success() {
            self.products = QueryState::Loading;
        }
        self.fetcher.spawn_products(self.current_key.clone());
    }

    /// Applies a finished fetch
    ///
    /// Products results for a key other than the current one are discarded.
    pub fn apply(&mut self, message: FetchMessage) {
        match message {
            FetchMessage::Products { key, result } => {
                if key != self.current_key {
                    tracing::debug!(?key, current = ?self.current_key, "discarding stale response");
                    return;
                }
                match result {
                    Ok(products) => {
                        self.products = QueryState::Success(products);
                        self.last_updated = Some(Local::now());
                        self.clamp_selection();
                        self.on_products_success();
                    }
                    Err(err) => {
                        self.products = QueryState::Error(err);
                    }
                }
            }
            FetchMessage::Categories(result) => match result {
                Ok(categories) => {
                    self.categories = QueryState::Success(categories);
                    if self.coordinator.on_categories_loaded() {
                        self.store.set_has_loaded_categories(true);
                    }
                }
                Err(err) => {
                    self.categories = QueryState::Error(err);
                    self.coordinator.on_categories_failed();
                }
            },
        }
        self.sync_filters();
    }

    fn on_products_success(&mut self) {
        if self.coordinator.on_products_success() {
            self.categories = QueryState::Loading;
            self.fetcher.spawn_categories();
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit the application
    /// - Arrows / `hjkl`: Move the selected card
    /// - `c`: Open the category selector
    /// - `s`: Open the sort selector
    /// - `r`: Refetch the current products
    /// - `?`: Toggle help
    /// - `Esc`: Close the open popup, or quit from the grid
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        if let Some(picker) = self.picker {
            self.handle_picker_key(picker, key_event);
            self.sync_filters();
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Char('r') => {
                self.refresh();
            }
            _ if !self.products.is_success() => {}
            KeyCode::Left | KeyCode::Char('h') => {
                self.move_selection_left();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.move_selection_right();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection_up();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection_down();
            }
            KeyCode::Char('c') => {
                self.open_category_picker();
            }
            KeyCode::Char('s') => {
                self.open_sort_picker();
            }
            _ => {}
        }
    }

    fn handle_picker_key(&mut self, picker: Picker, key_event: KeyEvent) {
        let option_count = match picker {
            Picker::Category(_) => self.category_options().len(),
            Picker::Sort(_) => SortOrder::ALL.len(),
        };

        match key_event.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.picker = None;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.picker = Some(picker.with_index(wrap_prev(picker.index(), option_count)));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.picker = Some(picker.with_index(wrap_next(picker.index(), option_count)));
            }
            KeyCode::Enter => {
                self.picker = None;
                match picker {
                    Picker::Category(index) => {
                        if let Some((value, _)) = self.category_options().into_iter().nth(index) {
                            self.store.set_selected_category(value);
                        }
                    }
                    Picker::Sort(index) => {
                        if let Some(sort) = SortOrder::ALL.get(index) {
                            self.store.set_sort_order(*sort);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    /// Opens the category selector; ignored until the categories have loaded
    fn open_category_picker(&mut self) {
        if !self.store.has_loaded_categories() {
            return;
        }
        let selected = self.store.selected_category();
        let index = self
            .category_options()
            .iter()
            .position(|(value, _)| *value == selected)
            .unwrap_or(0);
        self.picker = Some(Picker::Category(index));
    }

    fn open_sort_picker(&mut self) {
        let sort = self.store.sort_order();
        let index = SortOrder::ALL.iter().position(|s| *s == sort).unwrap_or(0);
        self.picker = Some(Picker::Sort(index));
    }

    /// Moves the selection one card left, wrapping to the last card
    fn move_selection_left(&mut self) {
        self.selected_index = wrap_prev(self.selected_index, self.product_count());
    }

    /// Moves the selection one card right, wrapping to the first card
    fn move_selection_right(&mut self) {
        self.selected_index = wrap_next(self.selected_index, self.product_count());
    }

    /// Moves the selection one row up, wrapping to the last row
    fn move_selection_up(&mut self) {
        let count = self.product_count();
        if count == 0 {
            return;
        }
        let columns = self.columns.max(1);
        if self.selected_index >= columns {
            self.selected_index -= columns;
        } else {
            // Same column on the last row, or the last card if that row is short
            let last_row_start = (count - 1) / columns * columns;
            self.selected_index = (last_row_start + self.selected_index).min(count - 1);
        }
    }

    /// Moves the selection one row down, wrapping to the first row
    fn move_selection_down(&mut self) {
        let count = self.product_count();
        if count == 0 {
            return;
        }
        let columns = self.columns.max(1);
        let next = self.selected_index + columns;
        self.selected_index = if next < count {
            next
        } else {
            self.selected_index % columns
        };
    }

    fn clamp_selection(&mut self) {
        let count = self.product_count();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }
}

impl Picker {
    /// Highlighted option index
    pub fn index(&self) -> usize {
        match self {
            Picker::Category(i) | Picker::Sort(i) => *i,
        }
    }

    fn with_index(self, index: usize) -> Self {
        match self {
            Picker::Category(_) => Picker::Category(index),
            Picker::Sort(_) => Picker::Sort(index),
        }
    }
}

fn wrap_prev(index: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else if index == 0 {
        count - 1
    } else {
        index - 1
    }
}

fn wrap_next(index: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else {
        (index + 1) % count
    }
}
