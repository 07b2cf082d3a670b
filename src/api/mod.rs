//! HTTP API layer
//!
//! Thin adapter between axum and the minutes use case: handlers parse the
//! request, call the generator, and turn its `Result` into a response.

pub mod error;
pub mod health;
pub mod minutes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::application::MinutesGenerator;

pub use error::{ApiError, ApiResult};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The minutes pipeline, with clients injected at startup
    pub generator: Arc<dyn MinutesGenerator>,
    /// Cancelled on shutdown; every request runs under a child token
    pub shutdown: CancellationToken,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Request body cap in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(generator: Arc<dyn MinutesGenerator>, max_upload_bytes: usize) -> Self {
        Self {
            generator,
            shutdown: CancellationToken::new(),
            startup_time: Utc::now(),
            max_upload_bytes,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/whisper/process-audio/", post(minutes::process_audio))
        .route("/whisper/process-audio", post(minutes::process_audio))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
