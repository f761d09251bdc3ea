//! ============================================================================
//! View Synchronizer - Boundary between the router and whatever renders pages
//! ============================================================================
//! The core only pushes state through `ViewSync`; it never reads layout back.
//! `RecordedView` keeps the last pushed state in memory so the CLI and tests
//! can inspect what a real page would show.
//! ============================================================================

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::types::Product;

/// Top-level pages; exactly one is visible at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Product grid (home and filtered results)
    AllProducts,
    /// Single product detail
    ProductDetail,
    /// Unrecognized location
    Error,
}

/// Rendering surface driven by the router and filter engine
pub trait ViewSync {
    /// Make `page` the only visible page
    fn show_page(&mut self, page: Page);

    /// Show exactly the grid entries whose id is in `visible_ids`
    fn set_product_grid_visibility(&mut self, visible_ids: &BTreeSet<i64>);

    fn set_checkbox_state(&mut self, criterion: &str, value: &str, checked: bool);

    /// Fill the detail view. `None` leaves it empty (unknown product id).
    fn show_product_detail(&mut self, product: Option<&Product>);

    fn show_error(&mut self);
}

/// Detail view content, as the page would display it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailContent {
    pub title: String,
    pub image: String,
    pub description: String,
}

/// In-memory view holding the last state pushed by the core
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordedView {
    page: Option<Page>,
    visible: BTreeSet<i64>,
    checkboxes: BTreeMap<String, BTreeMap<String, bool>>,
    detail: Option<DetailContent>,
}

impl RecordedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> Option<Page> {
        self.page
    }

    pub fn visible_ids(&self) -> &BTreeSet<i64> {
        &self.visible
    }

    pub fn is_checked(&self, criterion: &str, value: &str) -> bool {
        self.checkboxes
            .get(criterion)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(false)
    }

    pub fn checked_boxes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.checkboxes.iter().flat_map(|(criterion, values)| {
            values
                .iter()
                .filter(|(_, checked)| **checked)
                .map(move |(value, _)| (criterion.as_str(), value.as_str()))
        })
    }

    pub fn detail(&self) -> Option<&DetailContent> {
        self.detail.as_ref()
    }
}

impl ViewSync for RecordedView {
    fn show_page(&mut self, page: Page) {
        self.page = Some(page);
    }

    fn set_product_grid_visibility(&mut self, visible_ids: &BTreeSet<i64>) {
        self.visible = visible_ids.clone();
    }

    fn set_checkbox_state(&mut self, criterion: &str, value: &str, checked: bool) {
        self.checkboxes
            .entry(criterion.to_string())
            .or_default()
            .insert(value.to_string(), checked);
    }

    fn show_product_detail(&mut self, product: Option<&Product>) {
        // An unknown id keeps whatever the detail view showed last
        if let Some(product) = product {
            self.detail = Some(DetailContent {
                title: product.name.clone(),
                image: product.image.large.clone(),
                description: product.description.clone(),
            });
        } else if self.detail.is_none() {
            self.detail = Some(DetailContent::default());
        }
    }

    fn show_error(&mut self) {
        self.page = Some(Page::Error);
    }
}
