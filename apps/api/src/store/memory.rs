//! In-memory stores used by unit and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::discovery::dedup::{DedupSignature, HasSignature};
use crate::models::job::{JobRow, JobScores, JobStatus, NewJob};
use crate::models::profile::Profile;
use crate::store::{JobFilter, JobStore, ProfileStore, StoreResult};

#[derive(Default)]
pub struct InMemoryStore {
    jobs: Mutex<Vec<JobRow>>,
    profiles: Mutex<HashMap<Uuid, Profile>>,
    fail_writes: AtomicBool,
    stale_lookup: AtomicBool,
    stale_status: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write return a database error.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Makes the next canonical lookup miss, as if another request inserted
    /// the canonical job between lookup and insert.
    pub fn miss_next_lookup(&self) {
        self.stale_lookup.store(true, Ordering::SeqCst);
    }

    /// Makes the next status update miss, as if another request changed the
    /// status between read and write.
    pub fn miss_next_status_update(&self) {
        self.stale_status.store(true, Ordering::SeqCst);
    }

    pub fn add_profile(&self, profile: Profile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.row.id, profile);
    }

    pub fn jobs(&self) -> Vec<JobRow> {
        self.jobs.lock().unwrap().clone()
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolClosed);
        }
        Ok(())
    }
}

#[async_trait]
impl JobStore for InMemoryStore {
    async fn find_job(&self, id: Uuid) -> StoreResult<Option<JobRow>> {
        Ok(self.jobs.lock().unwrap().iter().find(|j| j.id == id).cloned())
    }

    async fn find_canonical(&self, signature: &DedupSignature) -> StoreResult<Option<Uuid>> {
        if self.stale_lookup.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        let jobs = self.jobs.lock().unwrap();
        Ok(canonical_for(&jobs, signature))
    }

    async fn insert_job(&self, job: &NewJob) -> StoreResult<Option<JobRow>> {
        self.check_writable()?;
        let mut jobs = self.jobs.lock().unwrap();
        if !job.is_duplicate() && canonical_for(&jobs, &job.signature()).is_some() {
            return Ok(None);
        }
        let row = JobRow {
            id: Uuid::new_v4(),
            title: job.title.clone(),
            company: job.company.clone(),
            description: job.description.clone(),
            location: job.location.clone(),
            country: job.country.clone(),
            city: job.city.clone(),
            is_remote: job.is_remote,
            experience_required: job.experience_required.clone(),
            experience_min_years: job.experience_min_years,
            experience_max_years: job.experience_max_years,
            required_skills: job.required_skills.clone(),
            nice_to_have_skills: job.nice_to_have_skills.clone(),
            relevance_score: 0.0,
            skill_match_score: 0.0,
            experience_match_score: 0.0,
            location_match_score: 0.0,
            source: job.source.clone(),
            source_url: job.source_url.clone(),
            status: JobStatus::Discovered.as_str().to_string(),
            is_duplicate: job.is_duplicate(),
            duplicate_of_id: job.duplicate_of_id,
            discovered_at: job.discovered_at,
            updated_at: Utc::now(),
        };
        jobs.push(row.clone());
        Ok(Some(row))
    }

    async fn update_scores(&self, id: Uuid, scores: &JobScores) -> StoreResult<Option<JobRow>> {
        self.check_writable()?;
        let mut jobs = self.jobs.lock().unwrap();
        Ok(jobs.iter_mut().find(|j| j.id == id).map(|job| {
            job.relevance_score = scores.overall;
            job.skill_match_score = scores.skill_match;
            job.experience_match_score = scores.experience_match;
            job.location_match_score = scores.location_match;
            job.updated_at = Utc::now();
            job.clone()
        }))
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    ) -> StoreResult<Option<JobRow>> {
        self.check_writable()?;
        if self.stale_status.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        let mut jobs = self.jobs.lock().unwrap();
        let current = jobs
            .iter_mut()
            .find(|j| j.id == id && j.status == from.as_str());
        Ok(current.map(|job| {
            job.status = to.as_str().to_string();
            job.updated_at = Utc::now();
            job.clone()
        }))
    }

    async fn list_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<JobRow>> {
        let contains = |field: Option<&str>, needle: &str| {
            field
                .map(|f| f.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false)
        };

        let mut jobs: Vec<JobRow> = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| filter.status.map_or(true, |s| j.status == s.as_str()))
            .filter(|j| {
                filter
                    .country
                    .as_deref()
                    .map_or(true, |c| contains(j.country.as_deref(), c))
            })
            .filter(|j| filter.is_remote.map_or(true, |r| j.is_remote == r))
            .filter(|j| filter.min_score.map_or(true, |m| j.relevance_score >= m))
            .filter(|j| {
                filter.search.as_deref().map_or(true, |s| {
                    contains(Some(&j.title), s)
                        || contains(Some(&j.company), s)
                        || contains(j.description.as_deref(), s)
                })
            })
            .cloned()
            .collect();

        jobs.sort_by(|a, b| {
            b.relevance_score
                .total_cmp(&a.relevance_score)
                .then(b.discovered_at.cmp(&a.discovered_at))
        });

        Ok(jobs
            .into_iter()
            .skip(filter.skip.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect())
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<bool> {
        self.check_writable()?;
        let mut jobs = self.jobs.lock().unwrap();
        let before = jobs.len();
        jobs.retain(|j| j.id != id);
        Ok(jobs.len() < before)
    }
}

fn canonical_for(jobs: &[JobRow], signature: &DedupSignature) -> Option<Uuid> {
    jobs.iter()
        .filter(|j| !j.is_duplicate)
        .filter(|j| DedupSignature::new(&j.title, &j.company) == *signature)
        .min_by_key(|j| j.discovered_at)
        .map(|j| j.id)
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn find_profile(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        Ok(self.profiles.lock().unwrap().get(&id).cloned())
    }
}
