// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    capture_handler, download_report_handler, health_handler, index_handler, languages_handler,
    metrics_handler, upload_handler,
};
use super::middleware::{request_id_layers, track_metrics};
use crate::analysis::Analyzer;
use crate::capture::Camera;
use crate::config::AppConfig;
use crate::error::Result;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Multipart framing on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub analyzer: Arc<Analyzer>,
    pub camera: Arc<dyn Camera>,
}

pub fn create_router(
    config: AppConfig,
    analyzer: Analyzer,
    camera: Arc<dyn Camera>,
) -> Result<Router> {
    let body_limit = config.storage.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
    let uploads = ServeDir::new(&config.storage.upload_dir);

    let state = AppState {
        config: Arc::new(config),
        analyzer: Arc::new(analyzer),
        camera,
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/languages", get(languages_handler))
        .route("/upload", post(upload_handler))
        .route("/capture", get(capture_handler))
        .route("/download-report", post(download_report_handler))
        .nest_service("/uploads", uploads)
        // Uploads are capped by the storage config, not axum's 2MB default
        .layer(DefaultBodyLimit::disable())
        .layer(tower_http::limit::RequestBodyLimitLayer::new(body_limit))
        .layer(middleware::from_fn(track_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
