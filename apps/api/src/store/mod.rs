//! Storage collaborators for jobs and profiles.
//!
//! Handlers and the discovery pipeline only see the `JobStore` / `ProfileStore`
//! traits. `PgStore` backs them in production; tests use the in-memory store.

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::discovery::dedup::DedupSignature;
use crate::models::job::{JobRow, JobScores, JobStatus, NewJob};
use crate::models::profile::Profile;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, sqlx::Error>;

/// Filters for listing jobs. Results are ordered by relevance, then recency.
#[derive(Debug, Clone, Deserialize)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub country: Option<String>,
    pub is_remote: Option<bool>,
    pub min_score: Option<f64>,
    pub search: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_list_limit")]
    pub limit: i64,
}

fn default_list_limit() -> i64 {
    50
}

impl Default for JobFilter {
    fn default() -> Self {
        Self {
            status: None,
            country: None,
            is_remote: None,
            min_score: None,
            search: None,
            skip: 0,
            limit: default_list_limit(),
        }
    }
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn find_job(&self, id: Uuid) -> StoreResult<Option<JobRow>>;

    /// Returns the oldest non-duplicate job whose title and company match
    /// `signature`, if any.
    async fn find_canonical(&self, signature: &DedupSignature) -> StoreResult<Option<Uuid>>;

    /// Inserts `job` with its signature. A canonical insert (no
    /// `duplicate_of_id`) returns `None` when another canonical job already
    /// holds the signature; duplicate inserts always succeed.
    async fn insert_job(&self, job: &NewJob) -> StoreResult<Option<JobRow>>;

    /// Overwrites all four score fields. Returns `None` if the job is gone.
    async fn update_scores(&self, id: Uuid, scores: &JobScores) -> StoreResult<Option<JobRow>>;

    /// Moves a job from `from` to `to`. Returns `None` if the job is gone or
    /// no longer in `from`.
    async fn update_status(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    ) -> StoreResult<Option<JobRow>>;

    async fn list_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<JobRow>>;

    async fn delete_job(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_profile(&self, id: Uuid) -> StoreResult<Option<Profile>>;
}
