use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted job listing.
///
/// `is_duplicate` and `duplicate_of_id` always move together: a duplicate row
/// points at the canonical job that shares its signature.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub is_remote: bool,
    pub experience_required: Option<String>,
    pub experience_min_years: Option<f64>,
    pub experience_max_years: Option<f64>,
    pub required_skills: Vec<String>,
    pub nice_to_have_skills: Vec<String>,
    pub relevance_score: f64,
    pub skill_match_score: f64,
    pub experience_match_score: f64,
    pub location_match_score: f64,
    pub source: String,
    pub source_url: Option<String>,
    pub status: String,
    pub is_duplicate: bool,
    pub duplicate_of_id: Option<Uuid>,
    pub discovered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRow {
    pub fn scores(&self) -> JobScores {
        JobScores {
            overall: self.relevance_score,
            skill_match: self.skill_match_score,
            experience_match: self.experience_match_score,
            location_match: self.location_match_score,
        }
    }
}

/// Fields needed to insert a job. Scores start at 0.0 and status at `discovered`.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub is_remote: bool,
    pub experience_required: Option<String>,
    pub experience_min_years: Option<f64>,
    pub experience_max_years: Option<f64>,
    pub required_skills: Vec<String>,
    pub nice_to_have_skills: Vec<String>,
    pub source: String,
    pub source_url: Option<String>,
    /// Canonical job this one duplicates, if storage already had its signature.
    pub duplicate_of_id: Option<Uuid>,
    pub discovered_at: DateTime<Utc>,
}

impl NewJob {
    pub fn is_duplicate(&self) -> bool {
        self.duplicate_of_id.is_some()
    }
}

/// The four relevance scores carried on a job, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JobScores {
    pub overall: f64,
    pub skill_match: f64,
    pub experience_match: f64,
    pub location_match: f64,
}

impl JobScores {
    pub const NEUTRAL: f64 = 0.5;

    /// Substituted for every sub-score when the scoring call fails.
    pub fn neutral() -> Self {
        Self {
            overall: Self::NEUTRAL,
            skill_match: Self::NEUTRAL,
            experience_match: Self::NEUTRAL,
            location_match: Self::NEUTRAL,
        }
    }

    /// The first score outside [0, 1], named by its model reply key.
    pub fn out_of_range(&self) -> Option<(&'static str, f64)> {
        [
            ("overall_score", self.overall),
            ("skill_match", self.skill_match),
            ("experience_match", self.experience_match),
            ("location_match", self.location_match),
        ]
        .into_iter()
        .find(|(_, value)| !(0.0..=1.0).contains(value))
    }
}

/// Position of a job in the candidate's pipeline.
///
/// ```text
/// discovered -> interested -> applied -> interviewing -> offered -> accepted
///     |             |            |            |             \-> rejected
///     |             |            |            \-> rejected
///     |             |            \-> rejected | withdrawn
///     \-------------+-> expired
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Discovered,
    Interested,
    Applied,
    Interviewing,
    Offered,
    Accepted,
    Rejected,
    Withdrawn,
    Expired,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Discovered => "discovered",
            JobStatus::Interested => "interested",
            JobStatus::Applied => "applied",
            JobStatus::Interviewing => "interviewing",
            JobStatus::Offered => "offered",
            JobStatus::Accepted => "accepted",
            JobStatus::Rejected => "rejected",
            JobStatus::Withdrawn => "withdrawn",
            JobStatus::Expired => "expired",
        }
    }

    /// Whether a job in `self` may move to `next`. Re-asserting the current
    /// status is allowed.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        use JobStatus::*;

        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Discovered, Interested)
                | (Discovered, Expired)
                | (Interested, Applied)
                | (Interested, Expired)
                | (Applied, Interviewing)
                | (Applied, Rejected)
                | (Applied, Withdrawn)
                | (Interviewing, Offered)
                | (Interviewing, Rejected)
                | (Offered, Accepted)
                | (Offered, Rejected)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discovered" => Ok(JobStatus::Discovered),
            "interested" => Ok(JobStatus::Interested),
            "applied" => Ok(JobStatus::Applied),
            "interviewing" => Ok(JobStatus::Interviewing),
            "offered" => Ok(JobStatus::Offered),
            "accepted" => Ok(JobStatus::Accepted),
            "rejected" => Ok(JobStatus::Rejected),
            "withdrawn" => Ok(JobStatus::Withdrawn),
            "expired" => Ok(JobStatus::Expired),
            other => Err(format!("unknown job status '{other}'")),
        }
    }
}
