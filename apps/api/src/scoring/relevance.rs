//! Relevance Scorer: asks the LLM how well a job fits a candidate profile.
//!
//! The scorer never fails: any transport error, timeout, unparseable reply,
//! missing key or out-of-range value yields the neutral 0.5 fallback for all
//! four scores. Retrying is left to the caller (a later recompute).
//!
//! `AppState` holds an `Arc<dyn RelevanceScorer>`, constructed once at startup.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::{strip_json_fences, CompletionProvider, LlmError};
use crate::models::job::{JobRow, JobScores};
use crate::models::profile::Profile;
use crate::scoring::prompts::{SCORING_PROMPT_TEMPLATE, SCORING_SYSTEM};

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerBackend {
    Llm,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevanceReport {
    pub scores: JobScores,
    pub reasoning: Option<String>,
    /// Whether the scores came from the model or the neutral fallback.
    pub scorer_backend: ScorerBackend,
}

impl RelevanceReport {
    pub fn fallback() -> Self {
        Self {
            scores: JobScores::neutral(),
            reasoning: None,
            scorer_backend: ScorerBackend::Fallback,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait RelevanceScorer: Send + Sync {
    /// Always returns four scores in [0, 1].
    async fn score(&self, job: &JobRow, profile: &Profile) -> RelevanceReport;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmRelevanceScorer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ScoringFailure {
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model reply is not a valid score object: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} = {value} is outside [0, 1]")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Shape the model is asked to return. Every score key is required.
#[derive(Debug, Deserialize)]
struct ModelScores {
    overall_score: f64,
    skill_match: f64,
    experience_match: f64,
    location_match: f64,
    #[serde(default)]
    reasoning: Option<String>,
}

pub struct LlmRelevanceScorer {
    provider: Arc<dyn CompletionProvider>,
    timeout: Duration,
}

impl LlmRelevanceScorer {
    /// `timeout` bounds the whole model call, retries included.
    pub fn new(provider: Arc<dyn CompletionProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    async fn try_score(
        &self,
        job: &JobRow,
        profile: &Profile,
    ) -> Result<RelevanceReport, ScoringFailure> {
        let prompt = build_prompt(job, profile);
        let call = self.provider.complete(&prompt, SCORING_SYSTEM);

        let reply = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ScoringFailure::Timeout(self.timeout))??;

        parse_reply(&reply)
    }
}

#[async_trait]
impl RelevanceScorer for LlmRelevanceScorer {
    async fn score(&self, job: &JobRow, profile: &Profile) -> RelevanceReport {
        match self.try_score(job, profile).await {
            Ok(report) => {
                debug!(
                    "Scored job {} for profile {}: overall={:.2}",
                    job.id, profile.row.id, report.scores.overall
                );
                report
            }
            Err(e) => {
                warn!(
                    "Relevance scoring failed for job {} / profile {}, using neutral fallback: {e}",
                    job.id, profile.row.id
                );
                RelevanceReport::fallback()
            }
        }
    }
}

fn parse_reply(reply: &str) -> Result<RelevanceReport, ScoringFailure> {
    let parsed: ModelScores = serde_json::from_str(strip_json_fences(reply))?;

    let scores = JobScores {
        overall: parsed.overall_score,
        skill_match: parsed.skill_match,
        experience_match: parsed.experience_match,
        location_match: parsed.location_match,
    };
    if let Some((field, value)) = scores.out_of_range() {
        return Err(ScoringFailure::OutOfRange { field, value });
    }

    Ok(RelevanceReport {
        scores,
        reasoning: parsed.reasoning,
        scorer_backend: ScorerBackend::Llm,
    })
}

fn build_prompt(job: &JobRow, profile: &Profile) -> String {
    let job_json = json!({
        "title": job.title,
        "company": job.company,
        "required_skills": job.required_skills,
        "nice_to_have_skills": job.nice_to_have_skills,
        "experience_required": job.experience_required,
        "experience_min_years": job.experience_min_years,
        "experience_max_years": job.experience_max_years,
        "location": job.location,
        "country": job.country,
        "city": job.city,
        "is_remote": job.is_remote,
    });

    let skills: Vec<String> = profile
        .skills
        .iter()
        .map(|s| format!("{} ({})", s.name, s.proficiency))
        .collect();
    let profile_json = json!({
        "current_title": profile.row.current_title,
        "current_company": profile.row.current_company,
        "years_of_experience": profile.row.years_of_experience,
        "skills": skills,
        "preferred_countries": profile.row.preferred_countries,
        "preferred_cities": profile.row.preferred_cities,
        "remote_preference": profile.row.remote_preference,
    });

    SCORING_PROMPT_TEMPLATE
        .replace("{job_json}", &format!("{job_json:#}"))
        .replace("{profile_json}", &format!("{profile_json:#}"))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
