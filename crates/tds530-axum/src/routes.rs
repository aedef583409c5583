//! Route definitions and router construction.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::http::Uri;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::error::HttpError;
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            use axum::http::HeaderValue;
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Routes nested under `/api`. Unknown API paths get a JSON 404.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(handlers::status::get))
        .route("/events", get(handlers::events::stream))
        .fallback(not_found)
}

/// Create the router with the data and API routes only.
///
/// Anything that is not a known route, `/` included, is a JSON 404.
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    api_router(ctx, cors_config).fallback(not_found)
}

/// Create a router that also serves the web UI from `static_dir`.
///
/// Files are served as-is; any path that matches neither a route nor a
/// file falls back to `index.html`.
pub fn create_spa_router<P: AsRef<Path>>(
    ctx: AxumContext,
    static_dir: P,
    cors_config: &CorsConfig,
) -> Router {
    let static_path = static_dir.as_ref();
    let index_path = static_path.join("index.html");
    let serve_dir = ServeDir::new(static_path).fallback(ServeFile::new(&index_path));

    api_router(ctx, cors_config).fallback_service(serve_dir)
}

fn api_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);

    Router::new()
        .route("/health", get(health_check))
        .route("/v1", get(handlers::samples::latest))
        .route("/v1/", get(handlers::samples::latest))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}

async fn not_found(uri: Uri) -> HttpError {
    HttpError::NotFound(format!("No route for {}", uri.path()))
}
