//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::kernel::ServerDeps;
use crate::server::routes::{
    download_media_handler, download_video_handler, download_zip_handler, extract_handler,
    fetch_reel_handler, generate_meta_handler, health_handler, preflight_handler,
    proxy_download_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum router around an already-wired dependency container.
pub fn build_router(deps: ServerDeps) -> Router {
    let state = AppState {
        deps: Arc::new(deps),
    };

    // Public API, any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/extract",
            post(extract_handler).options(preflight_handler),
        )
        .route(
            "/api/simple-extract",
            post(extract_handler).options(preflight_handler),
        )
        .route(
            "/api/fetch-reel",
            post(fetch_reel_handler).options(preflight_handler),
        )
        .route(
            "/api/download-media",
            post(download_media_handler).options(preflight_handler),
        )
        .route(
            "/api/download-video",
            post(download_video_handler).options(preflight_handler),
        )
        .route(
            "/api/proxy-download",
            post(proxy_download_handler).options(preflight_handler),
        )
        .route(
            "/api/download-zip",
            post(download_zip_handler).options(preflight_handler),
        )
        .route(
            "/api/generate-meta",
            post(generate_meta_handler).options(preflight_handler),
        )
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Build the Axum application from configuration.
pub fn build_app(config: &Config, pool: Option<PgPool>) -> Result<Router> {
    let deps = ServerDeps::from_config(config, pool)?;
    Ok(build_router(deps))
}
