//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::jobs::{parse_job_id, queries, validate_new_job, validate_progress};
use crate::models::job::{JobRow, NewJob, ProgressUpdate};
use crate::state::AppState;

/// GET /jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(queries::list_jobs(&state.db).await?))
}

/// GET /jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobRow>, AppError> {
    let id = parse_job_id(&id)?;
    let job = queries::get_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// POST /jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<NewJob>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    validate_new_job(&request)?;
    let job = queries::insert_job(&state.db, &request).await?;
    info!(job_id = %job.id, company = %job.company, "Job created");
    Ok((StatusCode::CREATED, Json(job)))
}

/// PATCH /jobs/:id/progress
pub async fn handle_update_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ProgressUpdate>,
) -> Result<Json<JobRow>, AppError> {
    let id = parse_job_id(&id)?;
    validate_progress(request.progress)?;
    let job = queries::update_progress(&state.db, id, request.progress)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}
