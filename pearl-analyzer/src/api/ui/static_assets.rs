//! Static asset handlers
//!
//! Embeds CSS/JS at compile time

use axum::{http::StatusCode, response::{IntoResponse, Response}};

const COMPARISON_JS: &str = include_str!("../../../static/comparison.js");
const PEARL_UI_CSS: &str = include_str!("../../../static/pearl-ui.css");

fn asset(content_type: &'static str, body: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", content_type),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        body,
    )
        .into_response()
}

/// GET /static/comparison.js
pub async fn serve_comparison_js() -> Response {
    asset("application/javascript", COMPARISON_JS)
}

/// GET /static/pearl-ui.css
pub async fn serve_pearl_ui_css() -> Response {
    asset("text/css", PEARL_UI_CSS)
}
