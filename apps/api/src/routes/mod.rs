pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::discovery::handlers as discovery;
use crate::jobs::handlers as jobs;
use crate::scoring::handlers as scoring;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs API
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job).delete(jobs::handle_delete_job),
        )
        .route("/api/v1/jobs/:id/status", patch(jobs::handle_update_status))
        // Discovery API
        .route("/api/v1/jobs/discover", post(discovery::handle_discover))
        .route(
            "/api/v1/jobs/extract-skills",
            post(discovery::handle_extract_skills),
        )
        // Scoring API
        .route("/api/v1/jobs/:id/score", post(scoring::handle_score_job))
        .with_state(state)
}
