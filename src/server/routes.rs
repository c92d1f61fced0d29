//! Router configuration for the web server.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.settings.max_upload_bytes;

    Router::new()
        // Wizard pages
        .route("/", get(handlers::index))
        .route("/step/:step", get(handlers::step_page))
        .route("/shared/:id", get(handlers::shared_report))
        // Wizard API
        .route("/api/select-type", post(handlers::select_type))
        .route(
            "/api/upload",
            post(handlers::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/save-editor-content",
            post(handlers::save_editor_content),
        )
        .route("/api/next-step", post(handlers::next_step))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/enhance", post(handlers::enhance))
        .route("/api/share", post(handlers::share))
        // Downloads
        .route(
            "/api/download_template/:doc_type",
            get(handlers::download_template),
        )
        .route(
            "/api/download_sample/:doc_type",
            get(handlers::download_sample),
        )
        .route("/api/types", get(handlers::api_types))
        .route("/health", get(handlers::health))
        // Static assets (CSS/JS)
        .route("/static/style.css", get(handlers::serve_css))
        .route("/static/wizard.js", get(handlers::serve_js))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
