//! REST API server module
//!
//! Provides an OpenAPI 3.1 compliant REST API for browsing the catalog,
//! reconciling it with disk and running podcast downloads.

use crate::{Config, MediaLibrary, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Prefix under which [`start_api_server`] mounts the router
pub const API_PREFIX: &str = "/api/v1";

/// Create the API router with all route definitions
///
/// Routes are prefix-free; [`start_api_server`] nests them under [`API_PREFIX`].
///
/// # Routes
///
/// ## Catalog
/// - `POST /sync` - Reconcile every category root with the catalog
/// - `GET /categories/:category/entries` - List entries (`?parent_id=` for a directory)
/// - `GET /entries/:id` - Get single entry
/// - `POST /entries/:id/refresh` - Refresh one directory
/// - `DELETE /entries/:id` - Delete an entry recursively, files included
///
/// ## Podcasts
/// - `GET /podcasts/episodes?url=` - Feed listing for an episode selection step
/// - `POST /podcasts/download` - Download selected episodes in the background
///
/// ## Tasks
/// - `GET /tasks/:id/progress` - Progress 0-100
/// - `GET /tasks/:id` - Progress, state and timing
///
/// ## Search
/// - `GET /search/tools` - Registered search backends
/// - `POST /search` - Search shows
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
pub fn create_router(library: Arc<MediaLibrary>, config: Arc<Config>) -> Router {
    let state = AppState::new(library, config.clone());

    let router = Router::new()
        // Catalog
        .route("/sync", post(routes::sync_catalog))
        .route("/categories/:category/entries", get(routes::list_entries))
        .route(
            "/entries/:id",
            get(routes::get_entry).delete(routes::delete_entry),
        )
        .route("/entries/:id/refresh", post(routes::refresh_entry))
        // Podcasts
        .route("/podcasts/episodes", get(routes::list_episodes))
        .route("/podcasts/download", post(routes::download_episodes))
        // Tasks
        .route("/tasks/:id", get(routes::task_status))
        .route("/tasks/:id/progress", get(routes::task_progress))
        // Search
        .route("/search/tools", get(routes::list_search_tools))
        .route("/search", post(routes::search_podcasts))
        // System
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // Apply CORS middleware if enabled in config
    if config.server.cors_enabled {
        let cors = build_cors_layer(&config.server.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// `"*"` (or an empty list) allows any origin; otherwise only the listed
/// origins are allowed. All methods and headers are allowed.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Serves the router under [`API_PREFIX`] until `shutdown` completes, then
/// stops accepting connections and lets in-flight requests finish.
///
/// # Example
///
/// ```no_run
/// use media_catalog::{Config, MediaLibrary, shutdown_signal};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let library = Arc::new(MediaLibrary::new((*config).clone()).await?);
///
/// media_catalog::api::start_api_server(library, config, shutdown_signal()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server<F>(
    library: Arc<MediaLibrary>,
    config: Arc<Config>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_address = config.server.bind_address;

    tracing::info!(
        address = %bind_address,
        "Starting API server"
    );

    let app = Router::new().nest(API_PREFIX, create_router(library, config));

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %bind_address,
        "API server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
