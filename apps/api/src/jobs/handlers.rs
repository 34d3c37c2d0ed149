//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::manage::{self, CreateJobRequest, StatusUpdateRequest};
use crate::models::job::JobRow;
use crate::state::AppState;
use crate::store::JobFilter;

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(filter): Query<JobFilter>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let jobs = manage::list_jobs(state.jobs.as_ref(), &filter).await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    Ok(Json(manage::get_job(state.jobs.as_ref(), id).await?))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let job = manage::create_job(state.jobs.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// PATCH /api/v1/jobs/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<JobRow>, AppError> {
    let job = manage::change_status(state.jobs.as_ref(), id, req.status).await?;
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    manage::delete_job(state.jobs.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
