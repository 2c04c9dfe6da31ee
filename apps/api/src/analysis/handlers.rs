//! Axum route handlers for the Job Analysis API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::history;
use crate::analysis::metrics::{self, AnalysisMetrics};
use crate::analysis::service;
use crate::analysis::types::{
    BulkJobAnalysisRequest, BulkJobAnalysisResponse, ExtractSkillsRequest, ExtractSkillsResponse,
    JobAnalysisRequest, JobAnalysisResponse,
};
use crate::db;
use crate::errors::AppError;
use crate::models::analysis::TrainingRecommendationRow;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub analysis_id: Uuid,
    pub recommendations: Vec<TrainingRecommendationRow>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisHealthResponse {
    pub status: &'static str,
    pub llm_provider: &'static str,
    pub provider_healthy: bool,
    pub database_healthy: bool,
}

/// POST /job-analysis/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<JobAnalysisRequest>,
) -> Result<Json<JobAnalysisResponse>, AppError> {
    Ok(Json(service::analyze_job(&state, &request).await?))
}

/// POST /job-analysis/extract-skills
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    Json(request): Json<ExtractSkillsRequest>,
) -> Result<Json<ExtractSkillsResponse>, AppError> {
    Ok(Json(
        service::extract_skills(&state, &request.text, &request.context_type).await?,
    ))
}

/// POST /job-analysis/bulk
pub async fn handle_bulk_analyze(
    State(state): State<AppState>,
    Json(request): Json<BulkJobAnalysisRequest>,
) -> Result<Json<BulkJobAnalysisResponse>, AppError> {
    Ok(Json(service::bulk_analyze(&state, request).await?))
}

/// GET /job-analysis/recommendations/:id
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let analysis_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::Validation(format!("Invalid analysis id: {id}")))?;

    if !history::analysis_exists(&state.db, analysis_id).await? {
        return Err(AppError::NotFound(format!("Analysis {analysis_id} not found")));
    }

    let recommendations = history::recommendations_for(&state.db, analysis_id).await?;
    Ok(Json(RecommendationsResponse {
        analysis_id,
        recommendations,
    }))
}

/// GET /job-analysis/health
///
/// Always 200; `status` is "degraded" when either dependency is down.
pub async fn handle_analysis_health(State(state): State<AppState>) -> Json<AnalysisHealthResponse> {
    let (provider_healthy, database_healthy) =
        tokio::join!(state.llm.health_check(), db::ping(&state.db));

    Json(AnalysisHealthResponse {
        status: if provider_healthy && database_healthy {
            "healthy"
        } else {
            "degraded"
        },
        llm_provider: state.llm.name(),
        provider_healthy,
        database_healthy,
    })
}

/// GET /job-analysis/metrics
pub async fn handle_metrics(
    State(state): State<AppState>,
) -> Result<Json<AnalysisMetrics>, AppError> {
    Ok(Json(metrics::collect(&state.db).await?))
}
