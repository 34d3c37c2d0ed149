use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub full_name: String,
    pub headline: Option<String>,
    pub years_of_experience: f64,
    pub preferred_countries: Vec<String>,
    pub preferred_cities: Vec<String>,
    /// remote | hybrid | onsite | any
    pub remote_preference: String,
    pub current_title: Option<String>,
    pub current_company: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileSkillRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub name: String,
    pub proficiency: String,
    pub years_used: Option<f64>,
}

/// A candidate profile with its skills. Read-only input to scoring.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    #[serde(flatten)]
    pub row: ProfileRow,
    pub skills: Vec<ProfileSkillRow>,
}
