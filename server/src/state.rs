use std::sync::Arc;

use catalog_core::{Catalog, LoadError, SpecCache};
use tracing::info;

use super::config::Config;

pub struct AppState {
    pub config: Config,
    pub catalog: Arc<Catalog>,
    pub specs: SpecCache,
}

impl AppState {
    /// Load the catalog named by `config`. A load failure aborts startup.
    pub fn new(config: Config) -> Result<Arc<Self>, LoadError> {
        let catalog = Catalog::load_file(&config.catalog_path)?;
        info!(
            "Catalog {} ready with {} products",
            config.catalog_path.display(),
            catalog.len()
        );

        Ok(Self::with_catalog(config, catalog))
    }

    pub fn with_catalog(config: Config, catalog: Catalog) -> Arc<Self> {
        Arc::new(Self {
            config,
            catalog: Arc::new(catalog),
            specs: SpecCache::new(),
        })
    }
}
