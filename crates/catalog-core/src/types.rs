//! ============================================================================
//! Core Types for the Catalog Browser
//! ============================================================================
//! Product records as they appear in `product.json`, plus the navigation
//! states derived from the current location.
//! ============================================================================

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::selection::FilterSelection;

/// A single product in the catalog
/// Example: { "id": 1, "name": "Sony Xperia Z3", "specs": { "manufacturer": "Sony", "storage": 16 } }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: ProductImage,
    #[serde(default)]
    pub specs: Specs,
}

impl Product {
    /// Spec value for a criterion, if the product declares it
    pub fn spec(&self, name: &str) -> Option<&SpecValue> {
        self.specs.get(name)
    }
}

/// Image variants for a product. Only `large` is used by the detail view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(default)]
    pub large: String,
}

/// A spec value is either free text or a number (e.g. storage in GB)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for SpecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecValue::Number(n) => write!(f, "{}", n),
            SpecValue::Text(s) => f.write_str(s),
        }
    }
}

/// Spec name → value pairs, kept in document order.
///
/// Key order is significant: the specification index lists names in the
/// order they are first seen across the catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Specs(Vec<(String, SpecValue)>);

impl Specs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&SpecValue> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Insert or replace a value. A replaced key keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: SpecValue) {
        let name = name.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpecValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Specs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Specs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SpecsVisitor;

        impl<'de> Visitor<'de> for SpecsVisitor {
            type Value = Specs;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of spec names to string or number values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Specs, A::Error> {
                let mut specs = Specs::new();
                while let Some((name, value)) = access.next_entry::<String, SpecValue>()? {
                    specs.insert(name, value);
                }
                Ok(specs)
            }
        }

        deserializer.deserialize_map(SpecsVisitor)
    }
}

/// Which page of the catalog is showing, derived fresh from every location change
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationState {
    /// A location arrived before the catalog finished loading
    Loading,
    /// Full catalog, no filters
    Home,
    /// Detail view for a single product id (the id may not exist in the catalog)
    ProductDetail(i64),
    /// Catalog narrowed by the decoded selection
    Filtered(FilterSelection),
    /// Location matched none of the known forms
    Error,
}

impl NavigationState {
    /// Short label for logs and CLI output
    pub fn label(&self) -> &'static str {
        match self {
            NavigationState::Loading => "loading",
            NavigationState::Home => "home",
            NavigationState::ProductDetail(_) => "product",
            NavigationState::Filtered(_) => "filtered",
            NavigationState::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserialize() {
        let json = r#"{
            "id": 3,
            "name": "Boot",
            "description": "Warm",
            "image": { "small": "s.jpg", "large": "l.jpg" },
            "specs": { "style": "Ankle", "heel": 5, "color": "Black" }
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, 3);
        assert_eq!(product.image.large, "l.jpg");
        assert_eq!(product.specs.names().collect::<Vec<_>>(), vec!["style", "heel", "color"]);
        assert_eq!(product.spec("heel"), Some(&SpecValue::Number(5.into())));
        assert_eq!(product.spec("style"), Some(&SpecValue::Text("Ankle".into())));
        assert_eq!(product.spec("size"), None);
    }

    #[test]
    fn test_specs_reject_non_scalar_values() {
        let json = r#"{ "id": 1, "name": "x", "specs": { "color": ["red"] } }"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }

    #[test]
    fn test_specs_serialize_in_document_order() {
        let mut specs = Specs::new();
        specs.insert("style", SpecValue::Text("Pump".into()));
        specs.insert("heel", SpecValue::Number(7.into()));
        specs.insert("style", SpecValue::Text("Boot".into()));

        let json = serde_json::to_string(&specs).unwrap();
        assert_eq!(json, r#"{"style":"Boot","heel":7}"#);
    }

    #[test]
    fn test_spec_value_display() {
        assert_eq!(SpecValue::Number(12.into()).to_string(), "12");
        assert_eq!(SpecValue::Text("Red".into()).to_string(), "Red");
    }
}
