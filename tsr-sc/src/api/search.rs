//! Search API handlers
//!
//! **[SC-API-010]** POST /search, GET /search/{id}, GET /searches, plus the
//! worker ingest routes for progress stages, result rows, and reports.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiResult, SearchError};
use crate::models::{CandidateResult, SearchSession, SearchSource, SearchStage, StageStatus};
use crate::services::SessionView;
use crate::AppState;

/// POST /search request
#[derive(Debug, Deserialize)]
pub struct SubmitSearchRequest {
    pub query: String,
    pub submitter: String,
}

/// POST /search response
#[derive(Debug, Serialize)]
pub struct SubmitSearchResponse {
    pub session_id: Uuid,
}

/// GET /searches query parameters
#[derive(Debug, Deserialize)]
pub struct ListSearchesParams {
    pub limit: Option<i64>,
}

/// POST /search/{id}/progress/{source} request
#[derive(Debug, Deserialize)]
pub struct UpdateStageRequest {
    pub stage: SearchStage,
    pub status: StageStatus,
}

/// POST /search/{id}/results request
#[derive(Debug, Deserialize)]
pub struct RecordResultRequest {
    pub source: SearchSource,
    pub candidate_ref: String,
    pub total_score: f64,
    pub name: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub summary: Option<String>,
}

/// **[SC-API-010]** POST /search
///
/// Submit a candidate search. Fire-and-forget: the caller polls
/// GET /search/{id} afterwards.
pub async fn submit_search(
    State(state): State<AppState>,
    Json(request): Json<SubmitSearchRequest>,
) -> ApiResult<Json<SubmitSearchResponse>> {
    let session_id = state
        .orchestrator
        .submit_search(&request.query, &request.submitter)
        .await?;

    Ok(Json(SubmitSearchResponse { session_id }))
}

/// **[SC-API-010]** GET /search/{session_id}
///
/// Poll the aggregate session view. Callers re-invoke on a fixed interval
/// while the status is `processing` and stop once it is terminal.
pub async fn get_search(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    let view = state.reader.get_session_view(session_id).await?;
    Ok(Json(view))
}

/// GET /searches — recent sessions, newest first
pub async fn list_searches(
    State(state): State<AppState>,
    Query(params): Query<ListSearchesParams>,
) -> ApiResult<Json<Vec<SearchSession>>> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let sessions = crate::db::sessions::list_recent_sessions(&state.db, limit).await?;
    Ok(Json(sessions))
}

/// **[SC-API-020]** POST /search/{session_id}/progress/{source}
///
/// Worker ingest: update one stage label on the worker's own seeded row.
pub async fn update_progress(
    State(state): State<AppState>,
    Path((session_id, source)): Path<(Uuid, String)>,
    Json(request): Json<UpdateStageRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let source = SearchSource::parse(&source)
        .ok_or_else(|| SearchError::InvalidInput(format!("unknown source: {}", source)))?;

    let updated = crate::db::progress::update_stage(
        &state.db,
        session_id,
        source,
        request.stage,
        request.status,
    )
    .await?;

    if !updated {
        return Err(SearchError::NotFound(format!(
            "no progress row seeded for session {} source {}",
            session_id,
            source.as_str()
        )));
    }

    Ok(Json(serde_json::json!({ "updated": true })))
}

/// **[SC-API-020]** POST /search/{session_id}/results
///
/// Worker ingest: upsert one candidate result row.
pub async fn record_result(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<RecordResultRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if crate::db::sessions::load_session(&state.db, session_id)
        .await?
        .is_none()
    {
        return Err(SearchError::NotFound(format!(
            "search session not found: {}",
            session_id
        )));
    }

    let result = CandidateResult {
        session_id,
        source: request.source,
        candidate_ref: request.candidate_ref,
        total_score: request.total_score,
        name: request.name,
        role: request.role,
        company: request.company,
        summary: request.summary,
        photo_url: None,
    };
    crate::db::results::upsert_result(&state.db, &result).await?;

    Ok(Json(serde_json::json!({ "recorded": true })))
}

/// **[SC-API-020]** POST /search/{session_id}/report/{source}
///
/// Worker ingest: merge a narrative report into the session's reports.
pub async fn attach_report(
    State(state): State<AppState>,
    Path((session_id, source)): Path<(Uuid, String)>,
    Json(report): Json<serde_json::Value>,
) -> ApiResult<Json<serde_json::Value>> {
    let source = SearchSource::parse(&source)
        .ok_or_else(|| SearchError::InvalidInput(format!("unknown source: {}", source)))?;

    let merged =
        crate::db::sessions::merge_report(&state.db, session_id, source.as_str(), &report).await?;

    if !merged {
        return Err(SearchError::NotFound(format!(
            "search session not found: {}",
            session_id
        )));
    }

    Ok(Json(serde_json::json!({ "attached": true })))
}

/// Build search routes
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/search", post(submit_search))
        .route("/searches", get(list_searches))
        .route("/search/:session_id", get(get_search))
        .route("/search/:session_id/progress/:source", post(update_progress))
        .route("/search/:session_id/results", post(record_result))
        .route("/search/:session_id/report/:source", post(attach_report))
}
