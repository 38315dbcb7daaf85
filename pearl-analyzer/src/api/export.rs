//! CSV download handlers

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::api::analysis::{parse_category, require_report};
use crate::error::ApiResult;
use crate::services::csv_export::{comparison_csv, tokens_csv};
use crate::AppState;

/// GET /api/export/comparison.csv query
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub category: Option<String>,
}

fn csv_response(filename: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// GET /api/export/tokens.csv
pub async fn export_tokens(State(state): State<AppState>) -> ApiResult<Response> {
    let report = require_report(&state).await?;
    let body = tokens_csv(&report)?;
    Ok(csv_response("pearl_tokens.csv", body))
}

/// GET /api/export/comparison.csv?category=word_type
pub async fn export_comparison(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Response> {
    let category = parse_category(query.category.as_deref())?;
    let report = require_report(&state).await?;
    let body = comparison_csv(report.table(category))?;
    Ok(csv_response(
        &format!("pearl_{}_comparison.csv", category.as_str()),
        body,
    ))
}

/// Build export routes
pub fn export_routes() -> Router<AppState> {
    Router::new()
        .route("/api/export/tokens.csv", get(export_tokens))
        .route("/api/export/comparison.csv", get(export_comparison))
}
