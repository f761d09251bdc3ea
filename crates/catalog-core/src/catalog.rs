//! ============================================================================
//! Catalog Store - Immutable product list loaded once at startup
//! ============================================================================
//! The catalog is read from a JSON array of products (local file, remote URL
//! or an in-memory string). Once loaded it is never mutated; dependents share
//! it behind an `Arc`.
//! ============================================================================

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::types::Product;

/// Catalog fetch failed or returned malformed data
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch catalog: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Duplicate product id {0} in catalog")]
    DuplicateId(i64),
}

/// Ordered, immutable sequence of products
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from already-parsed products, rejecting duplicate ids
    pub fn new(products: Vec<Product>) -> Result<Self, LoadError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(LoadError::DuplicateId(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON document
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Load a catalog from a local file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let catalog = Self::from_json(&json)?;
        info!("Loaded {} products from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Fetch a catalog from a URL. Single attempt, no timeout.
    pub async fn fetch(url: &str) -> Result<Self, LoadError> {
        debug!("Fetching catalog from {}", url);
        let response = reqwest::get(url).await?.error_for_status()?;
        let body = response.text().await?;

        let catalog = Self::from_json(&body)?;
        info!("Fetched {} products from {}", catalog.len(), url);
        Ok(catalog)
    }

    /// Load from a file path, or fetch when the source is an http(s) URL
    pub async fn load(source: &str) -> Result<Self, LoadError> {
        if source.starts_with("http://") || source.starts_with("https://") {
            Self::fetch(source).await
        } else {
            Self::load_file(source)
        }
    }

    /// Look up a product by exact id
    pub fn find(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO: &str = r#"[
        { "id": 1, "name": "A", "specs": { "color": "Red" } },
        { "id": 2, "name": "B", "specs": { "color": "Blue" } }
    ]"#;

    #[test]
    fn test_from_json() {
        let catalog = Catalog::from_json(TWO).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find(2).map(|p| p.name.as_str()), Some("B"));
        assert!(catalog.find(3).is_none());
    }

    #[test]
    fn test_malformed_json() {
        let err = Catalog::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));

        // An object instead of an array is malformed too
        let err = Catalog::from_json(r#"{ "id": 1 }"#).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[ { "id": 1, "name": "A" }, { "id": 1, "name": "B" } ]"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateId(1)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load_file("/nonexistent/product.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/product.json"));
    }

    #[tokio::test]
    async fn test_load_dispatches_to_file() {
        let path = std::env::temp_dir().join(format!("catalog-{}.json", std::process::id()));
        std::fs::write(&path, TWO).unwrap();

        let catalog = Catalog::load(path.to_str().unwrap()).await.unwrap();
        assert_eq!(catalog.len(), 2);

        std::fs::remove_file(&path).unwrap();
    }
}
