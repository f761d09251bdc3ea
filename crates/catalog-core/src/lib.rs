//! ============================================================================
//! CATALOG-CORE: Product Browsing Engine
//! ============================================================================
//! This crate handles all browsing logic for the catalog page:
//! - Catalog loading (file, URL or in-memory JSON)
//! - Specification index with a process-lifetime cache
//! - Progressive multi-criterion filtering
//! - Location encoding and routing between the four pages
//! - View synchronization through the `ViewSync` trait
//! ============================================================================

pub mod catalog;
pub mod filter;
pub mod location;
pub mod router;
pub mod selection;
pub mod specs;
pub mod types;
pub mod view;

// Re-export main types for convenience
pub use catalog::{Catalog, LoadError};
pub use filter::{apply, spec_matches, CheckboxEcho, DEFAULT_CRITERIA};
pub use location::{Location, RouteError};
pub use router::Router;
pub use selection::{DecodeError, FilterSelection};
pub use specs::{spec_names, SpecCache};
pub use types::*;
pub use view::{Page, RecordedView, ViewSync};
