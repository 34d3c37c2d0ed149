//! Manual job management: listing, creation, status changes and deletion.

use anyhow::anyhow;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::discovery::orchestrator::{job_from_posting, store_with_duplicate_check};
use crate::errors::AppError;
use crate::models::job::{JobRow, JobStatus};
use crate::models::posting::RawPosting;
use crate::store::{JobFilter, JobStore};

pub const MAX_LIST_LIMIT: i64 = 100;
pub const MANUAL_SOURCE: &str = "manual";

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub experience_required: String,
    /// When both skill lists are omitted they are extracted from the description.
    pub required_skills: Option<Vec<String>>,
    pub nice_to_have_skills: Option<Vec<String>>,
    pub source: Option<String>,
    #[serde(default)]
    pub source_url: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: JobStatus,
}

pub async fn list_jobs(
    store: &dyn JobStore,
    filter: &JobFilter,
) -> Result<Vec<JobRow>, AppError> {
    if filter.skip < 0 {
        return Err(AppError::Validation("skip must be >= 0".to_string()));
    }
    if !(1..=MAX_LIST_LIMIT).contains(&filter.limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_LIST_LIMIT}"
        )));
    }
    Ok(store.list_jobs(filter).await?)
}

pub async fn get_job(store: &dyn JobStore, id: Uuid) -> Result<JobRow, AppError> {
    store
        .find_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// Stores a manually submitted job, running the same derivations and
/// duplicate check as discovered postings.
pub async fn create_job(store: &dyn JobStore, req: CreateJobRequest) -> Result<JobRow, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if req.company.trim().is_empty() {
        return Err(AppError::Validation("company cannot be empty".to_string()));
    }

    let explicit_skills = req.required_skills.is_some() || req.nice_to_have_skills.is_some();
    let mut job = job_from_posting(RawPosting {
        title: req.title,
        company: req.company,
        description: req.description,
        location: req.location,
        experience_required: req.experience_required,
        source: req.source.unwrap_or_else(|| MANUAL_SOURCE.to_string()),
        source_url: req.source_url,
        discovered_at: Utc::now(),
    });
    if explicit_skills {
        job.required_skills = req.required_skills.unwrap_or_default();
        job.nice_to_have_skills = req.nice_to_have_skills.unwrap_or_default();
    }

    let row = store_with_duplicate_check(store, job).await?;
    info!("Created job {} ('{}' at '{}')", row.id, row.title, row.company);
    Ok(row)
}

/// Moves a job to `next`, rejecting transitions the pipeline does not allow.
pub async fn change_status(
    store: &dyn JobStore,
    id: Uuid,
    next: JobStatus,
) -> Result<JobRow, AppError> {
    let job = get_job(store, id).await?;
    let current: JobStatus = job
        .status
        .parse()
        .map_err(|e: String| AppError::Internal(anyhow!(e)))?;

    if !current.can_transition_to(next) {
        return Err(AppError::UnprocessableEntity(format!(
            "cannot move job from '{current}' to '{next}'"
        )));
    }
    if current == next {
        return Ok(job);
    }

    let Some(updated) = store.update_status(id, current, next).await? else {
        get_job(store, id).await?;
        return Err(AppError::Conflict(format!(
            "job {id} changed status concurrently; reload and retry"
        )));
    };
    info!("Job {id} moved from '{current}' to '{next}'");
    Ok(updated)
}

pub async fn delete_job(store: &dyn JobStore, id: Uuid) -> Result<(), AppError> {
    if store.delete_job(id).await? {
        info!("Deleted job {id}");
        Ok(())
    } else {
        Err(AppError::NotFound(format!("Job {id} not found")))
    }
}
