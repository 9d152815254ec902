//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The editor runs entirely in the browser as a wasm bundle. This server
//! only hosts that bundle (when `STATIC_DIR` is set) and proxies suggestion
//! requests to the model so the API key never reaches the page.

pub mod suggest;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/gemini", post(suggest::generate))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// Full application: API routes plus the static editor bundle, if any.
pub fn app(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let router = api_routes(state);
    let router = match static_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "serving static files");
            router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true))
        }
        None => router,
    };
    router
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
