//! Axum route handlers for the Discovery API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::discovery::orchestrator::{DiscoverRequest, DiscoverySummary};
use crate::discovery::skills::{extract_skills, ExtractedSkills};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractSkillsRequest {
    pub description: String,
}

/// POST /api/v1/jobs/discover
///
/// Runs discovery synchronously and returns the batch summary. Partial source
/// failures are reported per source, not as an error.
pub async fn handle_discover(
    State(state): State<AppState>,
    Json(request): Json<DiscoverRequest>,
) -> Result<Json<DiscoverySummary>, AppError> {
    let summary = state
        .discovery
        .discover(state.jobs.as_ref(), &request)
        .await?;
    Ok(Json(summary))
}

/// POST /api/v1/jobs/extract-skills
///
/// Previews skill extraction for a description without storing anything.
pub async fn handle_extract_skills(
    Json(request): Json<ExtractSkillsRequest>,
) -> Json<ExtractedSkills> {
    Json(extract_skills(&request.description))
}
