use std::sync::Arc;

use crate::discovery::orchestrator::DiscoveryService;
use crate::scoring::relevance::RelevanceScorer;
use crate::store::{JobStore, ProfileStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobStore>,
    pub profiles: Arc<dyn ProfileStore>,
    /// Default: `LlmRelevanceScorer` over the Anthropic client.
    pub scorer: Arc<dyn RelevanceScorer>,
    pub discovery: Arc<DiscoveryService>,
}
