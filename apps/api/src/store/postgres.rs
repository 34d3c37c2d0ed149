use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::discovery::dedup::{DedupSignature, HasSignature};
use crate::models::job::{JobRow, JobScores, JobStatus, NewJob};
use crate::models::profile::{Profile, ProfileRow, ProfileSkillRow};
use crate::store::{JobFilter, JobStore, ProfileStore, StoreResult};

/// Postgres-backed job and profile storage.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn find_job(&self, id: Uuid) -> StoreResult<Option<JobRow>> {
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_canonical(&self, signature: &DedupSignature) -> StoreResult<Option<Uuid>> {
        sqlx::query_scalar(
            r#"
            SELECT id FROM jobs
            WHERE signature = $1 AND NOT is_duplicate
            ORDER BY discovered_at ASC
            LIMIT 1
            "#,
        )
        .bind(signature.to_string())
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert_job(&self, job: &NewJob) -> StoreResult<Option<JobRow>> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (id, title, company, signature, description, location, country, city,
                 is_remote, experience_required, experience_min_years, experience_max_years,
                 required_skills, nice_to_have_skills, source, source_url, status,
                 is_duplicate, duplicate_of_id, discovered_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, now())
            ON CONFLICT (signature) WHERE NOT is_duplicate DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&job.title)
        .bind(&job.company)
        .bind(job.signature().to_string())
        .bind(&job.description)
        .bind(&job.location)
        .bind(&job.country)
        .bind(&job.city)
        .bind(job.is_remote)
        .bind(&job.experience_required)
        .bind(job.experience_min_years)
        .bind(job.experience_max_years)
        .bind(&job.required_skills)
        .bind(&job.nice_to_have_skills)
        .bind(&job.source)
        .bind(&job.source_url)
        .bind(JobStatus::Discovered.as_str())
        .bind(job.is_duplicate())
        .bind(job.duplicate_of_id)
        .bind(job.discovered_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = &row {
            info!(
                "Inserted job {} ({} @ {}) duplicate_of={:?}",
                row.id, row.title, row.company, row.duplicate_of_id
            );
        }
        Ok(row)
    }

    async fn update_scores(&self, id: Uuid, scores: &JobScores) -> StoreResult<Option<JobRow>> {
        sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs
            SET relevance_score = $2,
                skill_match_score = $3,
                experience_match_score = $4,
                location_match_score = $5,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(scores.overall)
        .bind(scores.skill_match)
        .bind(scores.experience_match)
        .bind(scores.location_match)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    ) -> StoreResult<Option<JobRow>> {
        sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs SET status = $3, updated_at = now()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<JobRow>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM jobs WHERE TRUE");

        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(country) = &filter.country {
            qb.push(" AND country ILIKE ").push_bind(format!("%{country}%"));
        }
        if let Some(is_remote) = filter.is_remote {
            qb.push(" AND is_remote = ").push_bind(is_remote);
        }
        if let Some(min_score) = filter.min_score {
            qb.push(" AND relevance_score >= ").push_bind(min_score);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            qb.push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR company ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        qb.push(" ORDER BY relevance_score DESC, discovered_at DESC OFFSET ")
            .push_bind(filter.skip)
            .push(" LIMIT ")
            .push_bind(filter.limit);

        qb.build_query_as::<JobRow>().fetch_all(&self.pool).await
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn find_profile(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let skills = sqlx::query_as::<_, ProfileSkillRow>(
            "SELECT * FROM profile_skills WHERE profile_id = $1 ORDER BY name",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Profile { row, skills }))
    }
}
