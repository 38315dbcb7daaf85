//! pearl-analyzer library interface for testing
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod error;
pub mod logging;
pub mod services;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use pearl_common::config::TomlConfig;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::trace::TraceLayer;

use crate::services::{AnalysisReport, TagCache};
use crate::types::Tagger;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<TomlConfig>,
    /// Tagging service boundary
    pub tagger: Arc<dyn Tagger>,
    /// Tagging results; held for the whole of a run, so runs never overlap
    pub cache: Arc<Mutex<TagCache>>,
    /// Latest successful run
    pub report: Arc<RwLock<Option<Arc<AnalysisReport>>>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(config: TomlConfig, tagger: Arc<dyn Tagger>) -> Self {
        Self {
            config: Arc::new(config),
            tagger,
            cache: Arc::new(Mutex::new(TagCache::new())),
            report: Arc::new(RwLock::new(None)),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Latest report, if a run has completed
    pub async fn current_report(&self) -> Option<Arc<AnalysisReport>> {
        self.report.read().await.clone()
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI routes (HTML page, static assets)
        .merge(api::ui_routes())
        // API routes
        .merge(api::analysis_routes())
        .merge(api::export_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
