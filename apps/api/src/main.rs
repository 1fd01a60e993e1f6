mod analysis;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod parsing;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::reviewer::{AiReviewer, GeminiReviewer};
use crate::analysis::store::PgAnalysisStore;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::llm_client::{LlmClient, LlmSettings};
use crate::routes::build_router;
use crate::scoring::duplicates::HashEmbedder;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeScope API v{}", env!("CARGO_PKG_VERSION"));

    let scoring = config.scoring_config()?;
    info!(
        ontology_version = scoring.version(),
        skills = scoring.ontology.skills.len(),
        "Scoring configuration loaded"
    );

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // AI review is optional; without a key scores come from the components alone
    let reviewer = build_reviewer(&config)?;

    let state = AppState {
        store: Arc::new(PgAnalysisStore::new(db)),
        reviewer,
        embedder: Arc::new(HashEmbedder::default()),
        scoring: Arc::new(RwLock::new(Arc::new(scoring))),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_reviewer(config: &Config) -> Result<Option<Arc<dyn AiReviewer>>> {
    let Some(api_key) = config.gemini_api_key.clone() else {
        warn!("GEMINI_API_KEY not set; AI review disabled");
        return Ok(None);
    };

    let settings = LlmSettings {
        model: config.gemini_model.clone(),
        api_version: config.gemini_api_version.clone(),
        temperature: config.gemini_temperature,
        max_output_tokens: config.gemini_max_tokens,
        retry: config.retry.clone(),
        ..LlmSettings::new(api_key)
    };
    let llm = LlmClient::new(settings)?;
    info!("LLM client initialized (models: {:?})", llm.model_chain());

    Ok(Some(Arc::new(GeminiReviewer::new(llm))))
}
