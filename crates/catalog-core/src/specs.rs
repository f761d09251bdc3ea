//! ============================================================================
//! Specification Index - Distinct spec names across the catalog
//! ============================================================================
//! Names are listed in the order they are first seen. The server computes the
//! index once and serves it from `SpecCache` for the rest of the process.
//! ============================================================================

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::catalog::Catalog;

/// Union of every product's spec names, in first-seen order
pub fn spec_names(catalog: &Catalog) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for product in catalog {
        for name in product.specs.names() {
            if seen.insert(name) {
                names.push(name.to_string());
            }
        }
    }

    names
}

/// Cached spec index
#[derive(Debug, Clone)]
struct CachedSpecs {
    names: Arc<Vec<String>>,
    computed_at: i64,
}

/// Process-lifetime memo of the spec index.
///
/// There is no invalidation: the catalog it is computed from is immutable for
/// the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct SpecCache {
    cached: Arc<RwLock<Option<CachedSpecs>>>,
}

impl SpecCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached index, computing it from `catalog` on first use
    pub async fn get_or_compute(&self, catalog: &Catalog) -> Arc<Vec<String>> {
        // Check cache first
        {
            let cache = self.cached.read().await;
            if let Some(cached) = cache.as_ref() {
                debug!(
                    "Spec cache hit: {} names (age: {}s)",
                    cached.names.len(),
                    chrono::Utc::now().timestamp() - cached.computed_at
                );
                return cached.names.clone();
            }
        }

        let mut cache = self.cached.write().await;
        // Another request may have filled it while we waited for the write lock
        if let Some(cached) = cache.as_ref() {
            return cached.names.clone();
        }

        let names = Arc::new(spec_names(catalog));
        info!("Computed spec index: {:?}", names);
        *cache = Some(CachedSpecs {
            names: names.clone(),
            computed_at: chrono::Utc::now().timestamp(),
        });

        names
    }

    /// Whether the index has been computed yet
    pub async fn is_cached(&self) -> bool {
        self.cached.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"[
                { "id": 1, "name": "A", "specs": { "manufacturer": "Acme", "color": "Red" } },
                { "id": 2, "name": "B", "specs": { "style": "Pump", "color": "Blue", "heel": 7 } },
                { "id": 3, "name": "C" }
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_spec_names_first_seen_order() {
        assert_eq!(
            spec_names(&catalog()),
            vec!["manufacturer", "color", "style", "heel"]
        );
    }

    #[test]
    fn test_spec_names_empty_catalog() {
        assert!(spec_names(&Catalog::default()).is_empty());
    }

    #[tokio::test]
    async fn test_cache_computes_once() {
        let cache = SpecCache::new();
        assert!(!cache.is_cached().await);

        let first = cache.get_or_compute(&catalog()).await;
        assert!(cache.is_cached().await);

        // A different catalog does not refresh the cached index
        let second = cache.get_or_compute(&Catalog::default()).await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 4);
    }
}
