//! ============================================================================
//! Router - Location → page state → view
//! ============================================================================
//! All state changes flow through the location:
//!
//! ```text
//! command (select / deselect / clear / close) → new FilterSelection
//!        → Location::to_url() → navigate() → Location::parse()
//!        → Home | ProductDetail | Filtered | Error → ViewSync
//! ```
//!
//! Routing is gated until the catalog has loaded; locations that arrive
//! earlier are kept in history and evaluated once `catalog_loaded` is called.
//! ============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::catalog::{Catalog, LoadError};
use crate::filter::{self, CheckboxEcho};
use crate::location::{Location, RouteError, HOME_PATH};
use crate::selection::FilterSelection;
use crate::specs::spec_names;
use crate::types::NavigationState;
use crate::view::{Page, ViewSync};

/// Explicit application state for one catalog page
pub struct Router<V: ViewSync> {
    view: V,
    catalog: Option<Arc<Catalog>>,
    /// Criteria order for the filter engine; derived from the catalog when empty
    criteria: Vec<String>,
    /// Last decoded selection (kept while a product detail is open)
    selection: FilterSelection,
    echo: CheckboxEcho,
    history: Vec<String>,
    cursor: usize,
    state: NavigationState,
}

impl<V: ViewSync> Router<V> {
    /// Create a router at `/` waiting for the catalog
    pub fn new(view: V) -> Self {
        Self {
            view,
            catalog: None,
            criteria: Vec::new(),
            selection: FilterSelection::new(),
            echo: CheckboxEcho::new(),
            history: vec![HOME_PATH.to_string()],
            cursor: 0,
            state: NavigationState::Loading,
        }
    }

    /// Use a fixed criteria order instead of the catalog's spec index
    pub fn with_criteria<S: Into<String>>(mut self, criteria: impl IntoIterator<Item = S>) -> Self {
        self.criteria = criteria.into_iter().map(Into::into).collect();
        self
    }

    /// Open the readiness gate and evaluate the current location
    pub fn catalog_loaded(&mut self, catalog: Arc<Catalog>) -> NavigationState {
        if self.criteria.is_empty() {
            self.criteria = spec_names(&catalog);
        }
        info!(
            "Catalog ready: {} products, criteria {:?}",
            catalog.len(),
            self.criteria
        );

        self.catalog = Some(catalog);
        self.render()
    }

    /// Catalog could not be loaded; routing stays gated
    pub fn load_failed(&mut self, err: &LoadError) {
        error!("Catalog failed to load: {}", err);
        self.view.show_error();
    }

    /// Push a new location and route to it
    pub fn navigate(&mut self, location: &str) -> NavigationState {
        self.history.truncate(self.cursor + 1);
        self.history.push(location.to_string());
        self.cursor = self.history.len() - 1;
        debug!("Navigate to {}", location);
        self.render()
    }

    /// Step back in history. Returns `None` at the oldest entry.
    pub fn back(&mut self) -> Option<NavigationState> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.render())
    }

    /// Step forward in history. Returns `None` at the newest entry.
    pub fn forward(&mut self) -> Option<NavigationState> {
        if self.cursor + 1 >= self.history.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.render())
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Checkbox checked
    pub fn select_value(&mut self, criterion: &str, value: &str) -> NavigationState {
        let next = self.selection.select(criterion, value);
        self.navigate_to_selection(next)
    }

    /// Checkbox unchecked
    pub fn deselect_value(&mut self, criterion: &str, value: &str) -> NavigationState {
        let next = self.selection.deselect(criterion, value);
        self.navigate_to_selection(next)
    }

    /// Checkbox clicked
    pub fn toggle_value(&mut self, criterion: &str, value: &str) -> NavigationState {
        let next = self.selection.toggle(criterion, value);
        self.navigate_to_selection(next)
    }

    /// "Clear filters" button
    pub fn clear(&mut self) -> NavigationState {
        self.navigate(HOME_PATH)
    }

    /// Close the detail view, returning to the last used filters
    pub fn close_detail(&mut self) -> NavigationState {
        let next = self.selection.clone();
        self.navigate_to_selection(next)
    }

    fn navigate_to_selection(&mut self, selection: FilterSelection) -> NavigationState {
        let url = Location::for_selection(selection).to_url();
        self.navigate(&url)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn location(&self) -> &str {
        &self.history[self.cursor]
    }

    pub fn criteria(&self) -> &[String] {
        &self.criteria
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_deref()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    fn render(&mut self) -> NavigationState {
        let Some(catalog) = self.catalog.clone() else {
            debug!("Catalog not loaded yet, holding {}", self.location());
            self.state = NavigationState::Loading;
            return self.state.clone();
        };

        let state = match Location::parse(self.location()) {
            Ok(Location::Home) => {
                self.render_home(&catalog);
                NavigationState::Home
            }
            Ok(Location::Product(id)) => {
                self.render_product(&catalog, id);
                NavigationState::ProductDetail(id)
            }
            Ok(Location::Filter(selection)) => {
                self.render_filtered(&catalog, selection.clone());
                NavigationState::Filtered(selection)
            }
            Err(RouteError::Decode(err)) => {
                warn!("{}, resetting to home", err);
                self.history[self.cursor] = HOME_PATH.to_string();
                self.render_home(&catalog);
                NavigationState::Home
            }
            Err(err @ RouteError::Unrecognized(_)) => {
                warn!("{}", err);
                self.view.show_error();
                NavigationState::Error
            }
        };

        info!("Routed {} -> {}", self.location(), state.label());
        self.state = state.clone();
        state
    }

    fn render_home(&mut self, catalog: &Catalog) {
        self.selection = FilterSelection::new();
        self.echo.sync(&mut self.view, &self.selection);

        let all: BTreeSet<i64> = catalog.iter().map(|p| p.id).collect();
        self.view.set_product_grid_visibility(&all);
        self.view.show_page(Page::AllProducts);
    }

    fn render_product(&mut self, catalog: &Catalog, id: i64) {
        let product = catalog.find(id);
        if product.is_none() {
            warn!("Product {} not found, showing empty detail view", id);
        }

        self.view.show_product_detail(product);
        self.view.show_page(Page::ProductDetail);
    }

    fn render_filtered(&mut self, catalog: &Catalog, selection: FilterSelection) {
        let results = filter::apply(&selection, &self.criteria, catalog);
        let visible: BTreeSet<i64> = results.iter().map(|p| p.id).collect();
        debug!(
            "Filter {} matched {} entries ({} distinct)",
            selection.encode(),
            results.len(),
            visible.len()
        );

        self.selection = selection;
        self.view.set_product_grid_visibility(&visible);
        self.echo.sync(&mut self.view, &self.selection);
        self.view.show_page(Page::AllProducts);
    }
}
