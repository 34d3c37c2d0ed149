//! Axum route handlers for the Scoring API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobRow;
use crate::scoring::relevance::{RelevanceReport, RelevanceScorer, ScorerBackend};
use crate::state::AppState;
use crate::store::{JobStore, ProfileStore};

#[derive(Debug, Deserialize)]
pub struct ScoreJobRequest {
    pub profile_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ScoreJobResponse {
    pub job_id: Uuid,
    pub profile_id: Uuid,
    pub relevance_score: f64,
    pub skill_match_score: f64,
    pub experience_match_score: f64,
    pub location_match_score: f64,
    pub scorer: ScorerBackend,
    pub reasoning: Option<String>,
}

/// Scores `job_id` against `profile_id` and overwrites all four score fields
/// on the job. A failed model call still writes the neutral fallback.
pub async fn score_job(
    jobs: &dyn JobStore,
    profiles: &dyn ProfileStore,
    scorer: &dyn RelevanceScorer,
    job_id: Uuid,
    profile_id: Uuid,
) -> Result<(JobRow, RelevanceReport), AppError> {
    let job = jobs
        .find_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    let profile = profiles
        .find_profile(profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {profile_id} not found")))?;

    let report = scorer.score(&job, &profile).await;

    let updated = jobs
        .update_scores(job_id, &report.scores)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    info!(
        "Job {job_id} scored for profile {profile_id}: overall={:.2} ({:?})",
        updated.relevance_score, report.scorer_backend
    );
    Ok((updated, report))
}

/// POST /api/v1/jobs/:id/score
pub async fn handle_score_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<ScoreJobRequest>,
) -> Result<Json<ScoreJobResponse>, AppError> {
    let (job, report) = score_job(
        state.jobs.as_ref(),
        state.profiles.as_ref(),
        state.scorer.as_ref(),
        job_id,
        request.profile_id,
    )
    .await?;

    let scores = job.scores();
    Ok(Json(ScoreJobResponse {
        job_id: job.id,
        profile_id: request.profile_id,
        relevance_score: scores.overall,
        skill_match_score: scores.skill_match,
        experience_match_score: scores.experience_match,
        location_match_score: scores.location_match,
        scorer: report.scorer_backend,
        reasoning: report.reasoning,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::Utc;

    use crate::discovery::orchestrator::job_from_posting;
    use crate::models::job::JobScores;
    use crate::models::posting::RawPosting;
    use crate::scoring::relevance::tests::{make_profile, Script, ScriptedProvider};
    use crate::scoring::relevance::LlmRelevanceScorer;
    use crate::store::memory::InMemoryStore;

    async fn seeded_store() -> (InMemoryStore, Uuid, Uuid) {
        let store = InMemoryStore::new();
        let job = store
            .insert_job(&job_from_posting(RawPosting {
                title: "Backend Engineer".to_string(),
                company: "Acme".to_string(),
                description: "Required: Python, AWS.".to_string(),
                location: "Bengaluru, India".to_string(),
                experience_required: "3-5 years".to_string(),
                source: "naukri".to_string(),
                source_url: String::new(),
                discovered_at: Utc::now(),
            }))
            .await
            .unwrap()
            .unwrap();
        let profile = make_profile();
        let profile_id = profile.row.id;
        store.add_profile(profile);
        (store, job.id, profile_id)
    }

    fn scorer(script: Script) -> LlmRelevanceScorer {
        LlmRelevanceScorer::new(ScriptedProvider::new(script), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_scores_written_to_job() {
        let (store, job_id, profile_id) = seeded_store().await;
        let scorer = scorer(Script::Reply(
            r#"{"overall_score": 0.7, "skill_match": 0.8, "experience_match": 0.6, "location_match": 0.9}"#,
        ));

        let (job, report) = score_job(&store, &store, &scorer, job_id, profile_id)
            .await
            .unwrap();

        assert_eq!(report.scorer_backend, ScorerBackend::Llm);
        assert_eq!(job.relevance_score, 0.7);
        assert_eq!(job.skill_match_score, 0.8);
        assert_eq!(job.experience_match_score, 0.6);
        assert_eq!(job.location_match_score, 0.9);
    }

    #[tokio::test]
    async fn test_failed_rescore_overwrites_stale_scores() {
        let (store, job_id, profile_id) = seeded_store().await;
        let previous = JobScores {
            overall: 0.9,
            skill_match: 0.8,
            experience_match: 0.85,
            location_match: 0.7,
        };
        store.update_scores(job_id, &previous).await.unwrap();

        let (job, report) = score_job(&store, &store, &scorer(Script::Fail), job_id, profile_id)
            .await
            .unwrap();

        assert_eq!(report.scorer_backend, ScorerBackend::Fallback);
        assert_eq!(job.scores(), JobScores::neutral());
        let stored = store.find_job(job_id).await.unwrap().unwrap();
        assert_eq!(stored.scores(), JobScores::neutral());
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let (store, _, profile_id) = seeded_store().await;
        let err = score_job(&store, &store, &scorer(Script::Fail), Uuid::new_v4(), profile_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unknown_profile_is_not_found() {
        let (store, job_id, _) = seeded_store().await;
        let err = score_job(&store, &store, &scorer(Script::Fail), job_id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_storage_failure_is_surfaced() {
        let (store, job_id, profile_id) = seeded_store().await;
        store.fail_writes();
        let err = score_job(&store, &store, &scorer(Script::Fail), job_id, profile_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
