//! UI Routes - comparison page for the Pearl tag analyzer
//!
//! Vanilla ES6+ page, no frameworks. Charts are drawn client-side as SVG
//! from `/api/comparison`.
//!
//! - **Root Page** (`root`): run button, category toggle, poem selection, charts
//! - **Static Assets** (`static_assets`): embedded CSS/JS

use axum::{routing::get, Router};
use crate::AppState;

mod root;
mod static_assets;

use root::root_page;
use static_assets::{serve_comparison_js, serve_pearl_ui_css};

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_page))
        .route("/static/comparison.js", get(serve_comparison_js))
        .route("/static/pearl-ui.css", get(serve_pearl_ui_css))
}
