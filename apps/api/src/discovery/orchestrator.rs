//! Job Discovery Orchestrator: fans out to sources, extracts skills,
//! deduplicates and persists.
//!
//! Flow: validate request → concurrent per-source fetch (each under a timeout)
//!       → merge in request order → extract skills → in-batch dedup
//!       → storage duplicate check → insert.
//!
//! A failing source contributes zero postings and never fails the batch.
//! Storage errors do.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::discovery::dedup::{deduplicate, HasSignature};
use crate::discovery::normalize::{parse_experience, parse_location};
use crate::discovery::skills::extract_skills;
use crate::discovery::sources::{JobSource, SourceError, SourceQuery, SourceRegistry};
use crate::errors::AppError;
use crate::models::job::{JobRow, NewJob};
use crate::models::posting::RawPosting;
use crate::store::{JobStore, StoreResult};

/// Upper bound on `limit` per discovery request.
pub const MAX_DISCOVERY_LIMIT: u32 = 200;

pub const STATUS_COMPLETED: &str = "completed";

// ────────────────────────────────────────────────────────────────────────────
// Request / summary types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverRequest {
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub countries: Option<Vec<String>>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_sources() -> Vec<String> {
    vec!["linkedin".to_string(), "naukri".to_string()]
}

fn default_limit() -> u32 {
    50
}

/// Per-source outcome, reported back so callers can see partial failures.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub fetched: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoverySummary {
    /// Postings returned by all healthy sources, before deduplication.
    pub jobs_found: usize,
    /// Postings stored as canonical jobs.
    pub jobs_new: usize,
    /// In-batch duplicates plus postings stored as duplicates of existing jobs.
    pub jobs_duplicate: usize,
    pub status: String,
    pub sources: Vec<SourceReport>,
}

// ────────────────────────────────────────────────────────────────────────────
// Service
// ────────────────────────────────────────────────────────────────────────────

/// Constructed once in `main` and shared through `AppState`.
pub struct DiscoveryService {
    registry: SourceRegistry,
    fetch_timeout: Duration,
}

impl DiscoveryService {
    pub fn new(registry: SourceRegistry, fetch_timeout: Duration) -> Self {
        Self {
            registry,
            fetch_timeout,
        }
    }

    pub async fn discover(
        &self,
        store: &dyn JobStore,
        request: &DiscoverRequest,
    ) -> Result<DiscoverySummary, AppError> {
        let sources = self.resolve_sources(request)?;
        let query = SourceQuery {
            keywords: request.keywords.clone(),
            countries: request.countries.clone().unwrap_or_default(),
            limit: request.limit as usize,
        };

        info!(
            "Discovering jobs from {:?} for keywords {:?}",
            sources.iter().map(|s| s.id()).collect::<Vec<_>>(),
            query.keywords
        );

        // join_all keeps input order, so the merge below is deterministic.
        let results = join_all(
            sources
                .iter()
                .map(|source| self.fetch_source(source.as_ref(), &query)),
        )
        .await;

        let mut reports = Vec::with_capacity(sources.len());
        let mut postings = Vec::new();
        for (source, result) in sources.iter().zip(results) {
            match result {
                Ok(mut batch) => {
                    batch.truncate(query.limit);
                    info!("Source {} returned {} postings", source.id(), batch.len());
                    reports.push(SourceReport {
                        source: source.id().to_string(),
                        fetched: batch.len(),
                        error: None,
                    });
                    postings.extend(batch);
                }
                Err(e) => {
                    warn!("Source {} failed, skipping: {e}", source.id());
                    reports.push(SourceReport {
                        source: source.id().to_string(),
                        fetched: 0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let jobs_found = postings.len();
        let candidates: Vec<NewJob> = postings.into_iter().map(job_from_posting).collect();
        let outcome = deduplicate(candidates);

        let mut jobs_new = 0;
        let mut jobs_duplicate = outcome.duplicates;
        for job in outcome.unique {
            let row = store_with_duplicate_check(store, job).await?;
            if row.is_duplicate {
                jobs_duplicate += 1;
            } else {
                jobs_new += 1;
            }
        }

        info!("Discovery finished: found={jobs_found} new={jobs_new} duplicate={jobs_duplicate}");

        Ok(DiscoverySummary {
            jobs_found,
            jobs_new,
            jobs_duplicate,
            status: STATUS_COMPLETED.to_string(),
            sources: reports,
        })
    }

    /// Validates the request and maps source ids to sources, dropping repeats.
    /// Runs before any fetch.
    fn resolve_sources(
        &self,
        request: &DiscoverRequest,
    ) -> Result<Vec<Arc<dyn JobSource>>, AppError> {
        if request.limit == 0 || request.limit > MAX_DISCOVERY_LIMIT {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_DISCOVERY_LIMIT}, got {}",
                request.limit
            )));
        }
        if request.sources.is_empty() {
            return Err(AppError::Validation("sources cannot be empty".to_string()));
        }

        let mut resolved: Vec<Arc<dyn JobSource>> = Vec::new();
        for id in &request.sources {
            let source = self.registry.get(id).ok_or_else(|| {
                AppError::Validation(format!(
                    "unknown source '{id}' (available: {})",
                    self.registry.ids().join(", ")
                ))
            })?;
            if !resolved.iter().any(|s| s.id() == source.id()) {
                resolved.push(source);
            }
        }
        Ok(resolved)
    }

    async fn fetch_source(
        &self,
        source: &dyn JobSource,
        query: &SourceQuery,
    ) -> Result<Vec<RawPosting>, SourceError> {
        match tokio::time::timeout(self.fetch_timeout, source.fetch(query)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(self.fetch_timeout)),
        }
    }
}

/// Inserts `job`, marking it as a duplicate of the canonical stored job with
/// the same signature if there is one. If another request claims the
/// signature between lookup and insert, the canonical job is re-read and
/// `job` is stored as its duplicate.
pub async fn store_with_duplicate_check(
    store: &dyn JobStore,
    mut job: NewJob,
) -> StoreResult<JobRow> {
    let signature = job.signature();
    loop {
        if let Some(canonical) = store.find_canonical(&signature).await? {
            info!(
                "'{}' at '{}' already stored as {canonical}, recording as duplicate",
                job.title, job.company
            );
            job.duplicate_of_id = Some(canonical);
        }
        if let Some(row) = store.insert_job(&job).await? {
            return Ok(row);
        }
        info!(
            "Signature of '{}' at '{}' claimed concurrently, retrying",
            job.title, job.company
        );
    }
}

/// Builds the insertable job for a posting: skills, location and experience
/// are derived from its free text.
pub fn job_from_posting(posting: RawPosting) -> NewJob {
    let skills = extract_skills(&posting.description);
    let location = parse_location(&posting.location);
    let experience = parse_experience(&posting.experience_required);

    NewJob {
        title: posting.title,
        company: posting.company,
        description: non_empty(posting.description),
        location: non_empty(posting.location),
        country: location.country,
        city: location.city,
        is_remote: location.is_remote,
        experience_required: non_empty(posting.experience_required),
        experience_min_years: experience.min_years,
        experience_max_years: experience.max_years,
        required_skills: skills.required,
        nice_to_have_skills: skills.nice_to_have,
        source: posting.source,
        source_url: non_empty(posting.source_url),
        duplicate_of_id: None,
        discovered_at: posting.discovered_at,
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
