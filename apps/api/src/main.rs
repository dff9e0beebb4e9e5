mod aggregation;
mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod narrative;
mod normalize;
mod resume;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::aggregation::cache::{MemoryResultCache, PgResultCache, ResultCache};
use crate::aggregation::credentials::{
    CredentialResolver, PgCredentialResolver, StaticCredentialResolver,
};
use crate::aggregation::pipeline::Aggregator;
use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::registry::AdapterRegistry;
use crate::llm_client::LlmClient;
use crate::narrative::narrator::Narrator;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Footprint API v{}", env!("CARGO_PKG_VERSION"));

    // Persistence collaborators: PostgreSQL when configured, in-memory otherwise
    let (cache, credentials): (Arc<dyn ResultCache>, Arc<dyn CredentialResolver>) =
        match &config.database_url {
            Some(url) => {
                let db = create_pool(url).await?;
                (
                    Arc::new(PgResultCache::new(db.clone())),
                    Arc::new(PgCredentialResolver::new(db)),
                )
            }
            None => {
                warn!("DATABASE_URL not set; using in-memory cache and credential store");
                (
                    Arc::new(MemoryResultCache::new()),
                    Arc::new(StaticCredentialResolver::new()),
                )
            }
        };

    // Extraction adapters
    let registry = Arc::new(AdapterRegistry::from_settings(&config.extraction_settings())?);
    let aggregator = Aggregator::new(registry, cache.clone());

    // Initialize LLM client
    let llm = LlmClient::new(config.llm_config())?;
    info!("LLM client initialized (model: {})", llm.model());
    let narrator = Narrator::new(Arc::new(llm));

    let state = AppState {
        aggregator,
        cache,
        credentials,
        narrator,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
