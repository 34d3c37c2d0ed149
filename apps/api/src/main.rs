mod config;
mod db;
mod discovery;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod routes;
mod scoring;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::discovery::orchestrator::DiscoveryService;
use crate::discovery::sources::{build_http_client, default_registry};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::scoring::relevance::LlmRelevanceScorer;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobScout API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(db));

    // Initialize LLM client and relevance scorer
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_timeout)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let scorer = Arc::new(LlmRelevanceScorer::new(Arc::new(llm), config.llm_timeout));

    // Initialize job sources
    let http = build_http_client(&config.scraper_user_agent, config.source_timeout)?;
    let registry = default_registry(http);
    info!("Job sources registered: {}", registry.ids().join(", "));
    let discovery = Arc::new(DiscoveryService::new(registry, config.source_timeout));

    let state = AppState {
        jobs: store.clone(),
        profiles: store,
        scorer,
        discovery,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the dashboard host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
