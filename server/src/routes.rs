use std::sync::Arc;

use axum::{extract::State, http::Uri, response::Redirect, Json};
use catalog_core::location::ENTRY_POINT;
use tracing::debug;

use crate::{error::AppError, state::AppState};

/// `/` → page entry point
pub async fn root_handler() -> Redirect {
    Redirect::to(ENTRY_POINT)
}

/// Distinct spec names across the catalog, computed once per process
pub async fn specs_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let names = state.specs.get_or_compute(&state.catalog).await;
    Json(names.as_ref().clone())
}

/// Fallback for paths the static directory does not have
pub async fn not_found_handler(uri: Uri) -> AppError {
    debug!("No static file for {}", uri.path());
    AppError::NotFound(uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{header::LOCATION, StatusCode},
        response::IntoResponse,
    };
    use catalog_core::Catalog;

    use crate::config::Config;

    fn state() -> Arc<AppState> {
        let catalog = Catalog::from_json(
            r#"[
                { "id": 1, "name": "A", "specs": { "manufacturer": "Acme", "style": "Pump" } },
                { "id": 2, "name": "B", "specs": { "style": "Boot", "color": "Red", "heel": 4 } }
            ]"#,
        )
        .unwrap();
        let config = Config::from_lookup(|_| None).unwrap();
        AppState::with_catalog(config, catalog)
    }

    #[tokio::test]
    async fn test_root_redirects_to_entry_point() {
        let response = root_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/index.html");
    }

    #[tokio::test]
    async fn test_specs_listed_in_first_seen_order() {
        let state = state();
        let Json(names) = specs_handler(State(state.clone())).await;
        assert_eq!(names, vec!["manufacturer", "style", "color", "heel"]);
        assert!(state.specs.is_cached().await);
    }

    #[tokio::test]
    async fn test_specs_served_from_cache() {
        let state = state();
        let Json(first) = specs_handler(State(state.clone())).await;
        let Json(second) = specs_handler(State(state)).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_not_found() {
        let uri: Uri = "/missing.css".parse().unwrap();
        let response = not_found_handler(uri).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
