use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A job listing as returned by a source, before persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPosting {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub experience_required: String,
    pub source: String,
    #[serde(default)]
    pub source_url: String,
    pub discovered_at: DateTime<Utc>,
}
