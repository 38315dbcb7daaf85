//! Analysis API handlers
//!
//! POST /api/analysis/run, GET /api/poems, GET /api/comparison,
//! GET /api/profiles/{poem}, POST /api/cache/invalidate

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use pearl_common::profile::TagCount;
use pearl_common::{ComparisonTable, TagCategory};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::services::{run_analysis, AnalysisReport, Corpus, RunSummary, TagCache};
use crate::AppState;

/// GET /api/poems response item
#[derive(Debug, Serialize)]
pub struct PoemListItem {
    pub id: String,
    pub name: String,
    /// Present once a run has completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<usize>,
}

/// GET /api/comparison query
#[derive(Debug, Default, Deserialize)]
pub struct ComparisonQuery {
    /// `word_type` (default) or `pos_tag`
    pub category: Option<String>,
    /// Comma-separated poem ids; all poems when absent
    pub poems: Option<String>,
}

/// GET /api/comparison response
#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub category_name: &'static str,
    #[serde(flatten)]
    pub table: ComparisonTable,
}

/// GET /api/profiles/{poem} response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub total_tokens: usize,
    pub word_type: Vec<TagCount>,
    pub pos_tag: Vec<TagCount>,
}

/// POST /api/cache/invalidate request
#[derive(Debug, Default, Deserialize)]
pub struct InvalidateRequest {
    /// Poem to drop; everything when absent
    pub poem: Option<String>,
}

/// POST /api/cache/invalidate response
#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    pub invalidated: usize,
}

/// Latest report or 404 before the first successful run
pub(crate) async fn require_report(state: &AppState) -> ApiResult<Arc<AnalysisReport>> {
    state
        .current_report()
        .await
        .ok_or_else(|| ApiError::NotFound("No analysis available yet; run one first".to_string()))
}

pub(crate) fn parse_category(raw: Option<&str>) -> ApiResult<TagCategory> {
    match raw {
        None => Ok(TagCategory::WordType),
        Some(raw) => raw
            .parse()
            .map_err(|e: pearl_common::Error| ApiError::BadRequest(e.to_string())),
    }
}

/// POST /api/analysis/run
///
/// Reload the corpus and run the pipeline. Returns 409 if a run is already
/// in progress. A failed run keeps the previous report and records the error.
pub async fn run(State(state): State<AppState>) -> ApiResult<Json<RunSummary>> {
    let mut cache = state
        .cache
        .try_lock()
        .map_err(|_| ApiError::Conflict("Analysis already running".to_string()))?;

    match load_and_run(&state, &mut cache).await {
        Ok(report) => {
            let summary = report.summary();
            *state.report.write().await = Some(Arc::new(report));
            *state.last_error.write().await = None;
            Ok(Json(summary))
        }
        Err(e) => {
            tracing::error!(error = %e, "Analysis run failed");
            *state.last_error.write().await = Some(e.to_string());
            Err(e.into())
        }
    }
}

async fn load_and_run(state: &AppState, cache: &mut TagCache) -> pearl_common::Result<AnalysisReport> {
    let corpus = Corpus::load(&state.config.corpus)?;
    run_analysis(&corpus, state.tagger.as_ref(), cache).await
}

/// GET /api/poems
pub async fn list_poems(State(state): State<AppState>) -> Json<Vec<PoemListItem>> {
    let report = state.current_report().await;

    let poems = state
        .config
        .corpus
        .poems
        .iter()
        .map(|source| PoemListItem {
            id: source.id.clone(),
            name: source.name.clone(),
            total_tokens: report
                .as_ref()
                .and_then(|r| r.poem(&source.id))
                .map(|p| p.total_tokens()),
        })
        .collect();

    Json(poems)
}

/// GET /api/comparison?category=word_type&poems=sggk,pearl
///
/// Comparison table restricted to the selected poems; tags that are zero for
/// all of them are left out.
pub async fn comparison(
    State(state): State<AppState>,
    Query(query): Query<ComparisonQuery>,
) -> ApiResult<Json<ComparisonResponse>> {
    let category = parse_category(query.category.as_deref())?;
    let report = require_report(&state).await?;
    let table = report.table(category);

    let table = match query.poems.as_deref() {
        None => table.clone(),
        Some(raw) => {
            let selected: Vec<&str> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if selected.is_empty() {
                return Err(ApiError::BadRequest("Select at least one poem".to_string()));
            }
            if let Some(unknown) = selected.iter().find(|id| !table.contains_poem(id)) {
                return Err(ApiError::NotFound(format!("Unknown poem: {}", unknown)));
            }
            table.select(&selected)?
        }
    };

    Ok(Json(ComparisonResponse {
        category_name: category.display_name(),
        table,
    }))
}

/// GET /api/profiles/{poem}
pub async fn profile(
    State(state): State<AppState>,
    Path(poem): Path<String>,
) -> ApiResult<Json<ProfileResponse>> {
    let report = require_report(&state).await?;
    let analysis = report
        .poem(&poem)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown poem: {}", poem)))?;

    Ok(Json(ProfileResponse {
        id: analysis.poem.id.clone(),
        name: analysis.poem.name.clone(),
        total_tokens: analysis.total_tokens(),
        word_type: analysis.profiles.get(TagCategory::WordType).ranked(),
        pos_tag: analysis.profiles.get(TagCategory::PosTag).ranked(),
    }))
}

/// POST /api/cache/invalidate
///
/// Body `{"poem": "pearl"}` drops one poem; an empty body drops everything.
pub async fn invalidate_cache(
    State(state): State<AppState>,
    request: Option<Json<InvalidateRequest>>,
) -> ApiResult<Json<InvalidateResponse>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let mut cache = state
        .cache
        .try_lock()
        .map_err(|_| ApiError::Conflict("Analysis running; try again later".to_string()))?;

    let invalidated = match request.poem {
        Some(poem) => usize::from(cache.invalidate(&poem)),
        None => cache.clear(),
    };

    tracing::info!(invalidated, "Tag cache invalidated");
    Ok(Json(InvalidateResponse { invalidated }))
}

/// Build analysis routes
pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/api/analysis/run", post(run))
        .route("/api/poems", get(list_poems))
        .route("/api/comparison", get(comparison))
        .route("/api/profiles/:poem", get(profile))
        .route("/api/cache/invalidate", post(invalidate_cache))
}
