//! ============================================================================
//! Filter Selection - Spec name → selected values
//! ============================================================================
//! Selections are immutable values. Commands (`select`, `deselect`, `toggle`,
//! `cleared`) return a new selection; the router re-encodes it into the
//! location, which is the single source of truth.
//!
//! Invariants:
//! - every key has a non-empty value list
//! - values within a key are unique and keep selection order
//! ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Filter payload in the location could not be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Filter payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Filter payload must be an object of value lists, got {0}")]
    Shape(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterSelection {
    entries: BTreeMap<String, Vec<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of spec names with at least one selected value
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Selected values for a spec name, in selection order
    pub fn values(&self, name: &str) -> &[String] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str, value: &str) -> bool {
        self.values(name).iter().any(|v| v == value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Every selected (name, value) pair
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Add a value. Selecting an already-selected value changes nothing.
    pub fn select(&self, name: &str, value: &str) -> Self {
        let mut next = self.clone();
        let values = next.entries.entry(name.to_string()).or_default();
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
        next
    }

    /// Remove a value; the last value removed takes the name with it
    pub fn deselect(&self, name: &str, value: &str) -> Self {
        let mut next = self.clone();
        if let Some(values) = next.entries.get_mut(name) {
            values.retain(|v| v != value);
            if values.is_empty() {
                next.entries.remove(name);
            }
        }
        next
    }

    /// Checkbox click: select when unchecked, deselect when checked
    pub fn toggle(&self, name: &str, value: &str) -> Self {
        if self.contains(name, value) {
            self.deselect(name, value)
        } else {
            self.select(name, value)
        }
    }

    pub fn cleared(&self) -> Self {
        Self::default()
    }

    /// JSON payload carried in the location
    pub fn encode(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parse a location payload.
    ///
    /// Values may be strings or numbers (numbers are kept as their JSON text).
    /// Empty lists are dropped and repeated values collapse to the first.
    pub fn decode(payload: &str) -> Result<Self, DecodeError> {
        let map = match serde_json::from_str::<Value>(payload)? {
            Value::Object(map) => map,
            other => return Err(DecodeError::Shape(json_kind(&other).to_string())),
        };

        let mut selection = Self::new();
        for (name, raw) in map {
            let items = match raw {
                Value::Array(items) => items,
                other => {
                    return Err(DecodeError::Shape(format!(
                        "{} for '{}'",
                        json_kind(&other),
                        name
                    )))
                }
            };

            for item in items {
                let value = match item {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    other => {
                        return Err(DecodeError::Shape(format!(
                            "{} inside '{}'",
                            json_kind(&other),
                            name
                        )))
                    }
                };
                selection = selection.select(&name, &value);
            }
        }

        Ok(selection)
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for FilterSelection {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |selection, (name, value)| {
            let (name, value): (String, String) = (name.into(), value.into());
            selection.select(&name, &value)
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_and_deselect() {
        let s = FilterSelection::new()
            .select("color", "red")
            .select("color", "blue")
            .select("style", "pump");

        assert_eq!(s.values("color"), ["red", "blue"]);
        assert_eq!(s.len(), 2);

        let s = s.deselect("color", "red");
        assert_eq!(s.values("color"), ["blue"]);

        // Removing the last value drops the name entirely
        let s = s.deselect("color", "blue");
        assert!(s.values("color").is_empty());
        assert_eq!(s.len(), 1);
        assert!(!s.encode().contains("color"));
    }

    #[test]
    fn test_commands_do_not_mutate_original() {
        let original = FilterSelection::new().select("color", "red");
        let _ = original.select("color", "blue");
        let _ = original.deselect("color", "red");
        let _ = original.cleared();
        assert_eq!(original.values("color"), ["red"]);
    }

    #[test]
    fn test_select_twice_is_noop() {
        let s = FilterSelection::new().select("heel", "5").select("heel", "5");
        assert_eq!(s.values("heel"), ["5"]);
    }

    #[test]
    fn test_toggle() {
        let s = FilterSelection::new().toggle("color", "red");
        assert!(s.contains("color", "red"));
        let s = s.toggle("color", "red");
        assert!(s.is_empty());
    }

    #[test]
    fn test_deselect_unknown_is_noop() {
        let s = FilterSelection::new().select("color", "red");
        assert_eq!(s.deselect("style", "pump"), s);
        assert_eq!(s.deselect("color", "green"), s);
    }

    #[test]
    fn test_round_trip() {
        let s: FilterSelection = [
            ("style", "pump"),
            ("color", "red"),
            ("color", "black"),
            ("manufacturer", "acme & sons"),
        ]
        .into_iter()
        .collect();

        let decoded = FilterSelection::decode(&s.encode()).unwrap();
        assert_eq!(decoded, s);
        assert_eq!(decoded.values("color"), ["red", "black"]);
    }

    #[test]
    fn test_round_trip_empty() {
        let s = FilterSelection::new();
        assert_eq!(s.encode(), "{}");
        assert_eq!(FilterSelection::decode("{}").unwrap(), s);
    }

    #[test]
    fn test_decode_normalizes() {
        let s = FilterSelection::decode(r#"{"color":[],"heel":[5,"5"],"style":["a","b","a"]}"#)
            .unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.values("heel"), ["5"]);
        assert_eq!(s.values("style"), ["a", "b"]);
    }

    #[test]
    fn test_decode_invalid() {
        assert!(matches!(
            FilterSelection::decode("{not json"),
            Err(DecodeError::Json(_))
        ));
        assert!(matches!(
            FilterSelection::decode(r#"["red"]"#),
            Err(DecodeError::Shape(_))
        ));
        assert!(matches!(
            FilterSelection::decode(r#"{"color":"red"}"#),
            Err(DecodeError::Shape(_))
        ));
        assert!(matches!(
            FilterSelection::decode(r#"{"color":[true]}"#),
            Err(DecodeError::Shape(_))
        ));
    }

    #[test]
    fn test_pairs() {
        let s = FilterSelection::new().select("style", "pump").select("color", "red");
        let pairs: Vec<_> = s.pairs().collect();
        assert_eq!(pairs, vec![("color", "red"), ("style", "pump")]);
    }
}
