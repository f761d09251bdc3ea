//! # Catalog Server
//!
//! Serves the catalog page and its data:
//!
//! - `GET /` redirects to `/index.html`
//! - `GET /specs` lists the distinct spec names across `product.json`
//! - everything else comes from the public directory (`product.json`,
//!   markup, scripts)
//!
//! The spec index is computed on the first `/specs` request and cached until
//! the process exits. The catalog is read once at startup; restart the server
//! to pick up a changed `product.json`.
//!
//! ## Configuration
//!
//! | Variable       | Default                    |
//! |----------------|----------------------------|
//! | `PORT`         | `8080`                     |
//! | `BIND_ADDR`    | `0.0.0.0`                  |
//! | `PUBLIC_DIR`   | `public`                   |
//! | `CATALOG_PATH` | `$PUBLIC_DIR/product.json` |
//!
//! A `.env` file in the working directory is loaded first. Log verbosity is
//! controlled with `RUST_LOG`.
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{handler::HandlerWithoutStateExt, routing::get, Router};
use tokio::{net::TcpListener, signal};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use config::Config;
use routes::{not_found_handler, root_handler, specs_handler};
use state::AppState;

pub async fn start_server() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: Could not load .env file: {}", e);
    }

    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("catalog_server=info".parse()?)
                .add_directive("catalog_core=info".parse()?),
        )
        .init();

    info!("Loading configuration...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config).context("Catalog failed to load")?;

    let app = app(state.clone());

    let address = format!("{}:{}", state.config.bind_addr, state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(
        "Server running on {address}, serving {}",
        state.config.public_dir.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Routes: `/` redirect, `/specs`, then static files
pub fn app(state: Arc<AppState>) -> Router {
    let static_files =
        ServeDir::new(&state.config.public_dir).not_found_service(not_found_handler.into_service());

    Router::new()
        .route("/", get(root_handler))
        .route("/specs", get(specs_handler))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
