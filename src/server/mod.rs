//! Axum-based HTTP server for the fruit-freshness service.
//!
//! This module serves the single-page UI, accepts uploads and webcam capture
//! requests, runs them through the analysis pipeline, and renders PDF
//! reports on demand.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual endpoints (upload, capture, report, health, metrics).
//! - `middleware`: Request ID tracking and request metrics.
//! - `routes`: The main router configuration that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::AnalysisResponse;
pub use routes::{create_router, AppState};
