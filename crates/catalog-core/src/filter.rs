//! ============================================================================
//! Filter Engine - Progressive narrowing of the catalog
//! ============================================================================
//! Criteria are applied in order. Each criterion with selected values filters
//! the output of the previous active criterion (AND across criteria); within a
//! criterion, a product is kept for every selected value it matches (OR).
//!
//! Products matching several values of one criterion appear once per match.
//! The result is not de-duplicated and keeps append order.
//! ============================================================================

use std::collections::BTreeSet;

use serde_json::Number;
use tracing::debug;

use crate::catalog::Catalog;
use crate::selection::FilterSelection;
use crate::types::{Product, SpecValue};
use crate::view::ViewSync;

/// Criteria order used when no spec index is available
pub const DEFAULT_CRITERIA: [&str; 4] = ["manufacturer", "style", "color", "heel"];

/// Narrow `catalog` by `selection`, visiting criteria in `criteria` order.
///
/// Selection keys missing from `criteria` are ignored. With no active
/// criterion the full catalog is returned.
pub fn apply<'a, S: AsRef<str>>(
    selection: &FilterSelection,
    criteria: &[S],
    catalog: &'a Catalog,
) -> Vec<&'a Product> {
    let mut working: Vec<&Product> = catalog.iter().collect();

    for criterion in criteria {
        let criterion = criterion.as_ref();
        let values = selection.values(criterion);
        if values.is_empty() {
            continue;
        }

        let mut accumulated = Vec::new();
        for value in values {
            for product in &working {
                let matched = product
                    .spec(criterion)
                    .is_some_and(|spec| spec_matches(spec, value));
                if matched {
                    accumulated.push(*product);
                }
            }
        }

        debug!(
            "Criterion '{}' {:?}: {} -> {} products",
            criterion,
            values,
            working.len(),
            accumulated.len()
        );
        // An active criterion with no matches still narrows, so the result
        // stays a subset of every single-criterion result.
        working = accumulated;
    }

    working
}

/// Compare one spec value against a selected filter value.
///
/// Numbers use loose equality with the filter text (`5` matches `"5"` and
/// `" 5.0 "`, an empty filter counts as zero). Text matches on
/// case-insensitive substring containment.
pub fn spec_matches(spec: &SpecValue, filter: &str) -> bool {
    match spec {
        SpecValue::Number(n) => loose_number_eq(n, filter),
        SpecValue::Text(text) => text.to_lowercase().contains(&filter.to_lowercase()),
    }
}

fn loose_number_eq(n: &Number, filter: &str) -> bool {
    let trimmed = filter.trim();
    let parsed = if trimmed.is_empty() {
        Some(0.0)
    } else {
        trimmed.parse::<f64>().ok()
    };

    match (n.as_f64(), parsed) {
        (Some(spec), Some(wanted)) => spec == wanted,
        _ => false,
    }
}

/// Tracks which checkboxes the view currently shows as checked, so that after
/// each filter pass exactly the selected `(criterion, value)` pairs are checked.
#[derive(Debug, Clone, Default)]
pub struct CheckboxEcho {
    checked: BTreeSet<(String, String)>,
}

impl CheckboxEcho {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every selected pair, uncheck everything else that was checked
    pub fn sync<V: ViewSync + ?Sized>(&mut self, view: &mut V, selection: &FilterSelection) {
        let wanted: BTreeSet<(String, String)> = selection
            .pairs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        for (name, value) in self.checked.difference(&wanted) {
            view.set_checkbox_state(name, value, false);
        }
        for (name, value) in &wanted {
            view.set_checkbox_state(name, value, true);
        }

        self.checked = wanted;
    }

    pub fn is_checked(&self, name: &str, value: &str) -> bool {
        self.checked
            .iter()
            .any(|(n, v)| n == name && v == value)
    }

    pub fn checked(&self) -> impl Iterator<Item = (&str, &str)> {
        self.checked.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}
